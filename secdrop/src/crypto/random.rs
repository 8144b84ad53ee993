//! Entropy for salts, nonces and generated passphrases

use rand_core::{CryptoRng, RngCore};

use crate::error::{Result, SecDropError};

/// Salt length for the key derivation step
pub const SALT_LEN: usize = 16;

/// Nonce length for AES-GCM
pub const NONCE_LEN: usize = 12;

/// Fills `buf` from a cryptographically secure source.
///
/// Uses the fallible `try_fill_bytes` so an unavailable OS source surfaces
/// as [`SecDropError::EntropyUnavailable`] instead of a panic.
pub fn fill_random<R: RngCore + CryptoRng + ?Sized>(rng: &mut R, buf: &mut [u8]) -> Result<()> {
    rng.try_fill_bytes(buf)
        .map_err(|e| SecDropError::EntropyUnavailable(e.to_string()))
}

/// Generates a fresh random salt
pub fn generate_salt<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    fill_random(rng, &mut salt)?;
    Ok(salt)
}

/// Generates a fresh random nonce for AES-GCM
pub fn generate_nonce<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Result<[u8; NONCE_LEN]> {
    let mut nonce = [0u8; NONCE_LEN];
    fill_random(rng, &mut nonce)?;
    Ok(nonce)
}
