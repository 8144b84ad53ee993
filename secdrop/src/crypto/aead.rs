//! AEAD - AES-256-GCM with a detached tag

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

use super::kdf::DerivedKey;
use super::random::NONCE_LEN;
use crate::error::{Result, SecDropError};

/// GCM authentication tag length
pub const TAG_LEN: usize = 16;

/// Context bound into every payload as associated data.
///
/// Fixed for the lifetime of format version 0x02. A different value still
/// encrypts fine but nothing else will be able to open the result.
pub const ASSOCIATED_DATA: &[u8] = b"api-key-secure-send-v1";

/// Ciphertext with its tag split off
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Same length as the plaintext
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

fn cipher_for(key: &DerivedKey) -> Result<Aes256Gcm> {
    Aes256Gcm::new_from_slice(key.expose_secret())
        .map_err(|e| SecDropError::CipherFailure(format!("AES-256-GCM key rejected: {}", e)))
}

/// Encrypts `plaintext` under `key`/`nonce`, authenticating `aad`.
///
/// The underlying cipher returns `ciphertext || tag`; the trailing 16 bytes
/// are split into [`Sealed::tag`].
pub fn seal(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Sealed> {
    let cipher = cipher_for(key)?;

    let mut ciphertext = cipher
        .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|e| SecDropError::CipherFailure(format!("AES-GCM encryption failed: {}", e)))?;

    if ciphertext.len() != plaintext.len() + TAG_LEN {
        return Err(SecDropError::CipherFailure(format!(
            "unexpected AES-GCM output length {} for {} plaintext bytes",
            ciphertext.len(),
            plaintext.len()
        )));
    }

    let tag_bytes = ciphertext.split_off(plaintext.len());
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&tag_bytes);

    Ok(Sealed { ciphertext, tag })
}

/// Verifies and decrypts. Any mismatch in key, nonce, ciphertext, tag or
/// `aad` yields [`SecDropError::AuthenticationFailed`].
pub fn open(
    key: &DerivedKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = cipher_for(key)?;

    let mut combined = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    combined.extend_from_slice(ciphertext);
    combined.extend_from_slice(tag);

    cipher
        .decrypt(Nonce::from_slice(nonce), Payload { msg: &combined, aad })
        .map(Zeroizing::new)
        .map_err(|_| SecDropError::AuthenticationFailed)
}
