//! Passphrase key derivation (PBKDF2-HMAC-SHA256)

use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretBox, SecretString};
use sha2::Sha256;
use zeroize::Zeroize;

use super::random::SALT_LEN;
use crate::error::{Result, SecDropError};

/// AES-256 key length
pub const KEY_LEN: usize = 32;

/// PBKDF2 rounds bound to algorithm id 0x01. Changing this changes the format.
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Wire id of PBKDF2-HMAC-SHA256
pub const ALGO_PBKDF2_SHA256: u8 = 0x01;

/// Wire id reserved for Argon2id. Never produced.
pub const ALGO_ARGON2ID_RESERVED: u8 = 0x02;

/// Derived AES key, zeroized on drop
pub type DerivedKey = SecretBox<[u8; KEY_LEN]>;

/// Key derivation method recorded in the envelope's algorithm byte.
///
/// Only PBKDF2 exists today. Argon2id (0x02) gets its own variant once it is
/// implemented; until then [`KdfAlgorithm::from_id`] refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfAlgorithm {
    Pbkdf2Sha256,
}

impl Default for KdfAlgorithm {
    fn default() -> Self {
        Self::Pbkdf2Sha256
    }
}

impl KdfAlgorithm {
    pub fn id(&self) -> u8 {
        match self {
            Self::Pbkdf2Sha256 => ALGO_PBKDF2_SHA256,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pbkdf2Sha256 => "PBKDF2-SHA256",
        }
    }

    /// Maps an envelope algorithm byte to a usable derivation method.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            ALGO_PBKDF2_SHA256 => Ok(Self::Pbkdf2Sha256),
            ALGO_ARGON2ID_RESERVED => Err(SecDropError::AlgorithmNotImplemented("Argon2id")),
            other => Err(SecDropError::UnsupportedAlgorithm(other)),
        }
    }
}

/// Per-request derivation inputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationParameters {
    pub salt: [u8; SALT_LEN],
    pub iterations: u32,
    pub algorithm: KdfAlgorithm,
}

impl DerivationParameters {
    pub fn new(salt: [u8; SALT_LEN], algorithm: KdfAlgorithm) -> Self {
        let iterations = match algorithm {
            KdfAlgorithm::Pbkdf2Sha256 => PBKDF2_ITERATIONS,
        };
        Self {
            salt,
            iterations,
            algorithm,
        }
    }
}

/// Derives the AES-256 key from a passphrase.
///
/// The passphrase is used as raw UTF-8 bytes, without normalization.
pub fn derive_key(passphrase: &SecretString, params: &DerivationParameters) -> Result<DerivedKey> {
    if params.iterations == 0 {
        return Err(SecDropError::KeyDerivationFailed(
            "iteration count must be non-zero".into(),
        ));
    }

    let mut output = [0u8; KEY_LEN];
    match params.algorithm {
        KdfAlgorithm::Pbkdf2Sha256 => pbkdf2_hmac::<Sha256>(
            passphrase.expose_secret().as_bytes(),
            &params.salt,
            params.iterations,
            &mut output,
        ),
    }

    let key = SecretBox::new(Box::new(output));
    output.zeroize();

    tracing::debug!(
        algorithm = params.algorithm.name(),
        iterations = params.iterations,
        "derived key"
    );
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passphrase(s: &str) -> SecretString {
        SecretString::from(s.to_string())
    }

    #[test]
    fn test_derive_key() {
        let params = DerivationParameters::new([7u8; SALT_LEN], KdfAlgorithm::Pbkdf2Sha256);
        let key = derive_key(&passphrase("correct horse battery staple"), &params).unwrap();
        assert_eq!(key.expose_secret().len(), 32);
        assert_eq!(params.iterations, 100_000);
    }

    #[test]
    fn test_derive_key_deterministic() {
        let params = DerivationParameters::new([1u8; SALT_LEN], KdfAlgorithm::Pbkdf2Sha256);
        let k1 = derive_key(&passphrase("test_password"), &params).unwrap();
        let k2 = derive_key(&passphrase("test_password"), &params).unwrap();
        assert_eq!(k1.expose_secret(), k2.expose_secret());
    }

    #[test]
    fn test_salt_changes_key() {
        let p1 = DerivationParameters::new([1u8; SALT_LEN], KdfAlgorithm::Pbkdf2Sha256);
        let p2 = DerivationParameters::new([2u8; SALT_LEN], KdfAlgorithm::Pbkdf2Sha256);
        let k1 = derive_key(&passphrase("test_password"), &p1).unwrap();
        let k2 = derive_key(&passphrase("test_password"), &p2).unwrap();
        assert_ne!(k1.expose_secret(), k2.expose_secret());
    }

    // RFC 7914 section 11, first 32 bytes of P="passwd", S="salt", c=1.
    #[test]
    fn test_pbkdf2_sha256_vector() {
        let mut out = [0u8; KEY_LEN];
        pbkdf2_hmac::<Sha256>(b"passwd", b"salt", 1, &mut out);
        assert_eq!(
            hex::encode(out),
            "55ac046e56e3089fec1691c22544b605f94185216dde0465e68b9d57c20dacbc"
        );
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let mut params = DerivationParameters::new([0u8; SALT_LEN], KdfAlgorithm::Pbkdf2Sha256);
        params.iterations = 0;
        let err = derive_key(&passphrase("pw"), &params).unwrap_err();
        assert!(matches!(err, SecDropError::KeyDerivationFailed(_)));
    }

    #[test]
    fn test_algorithm_ids() {
        assert_eq!(KdfAlgorithm::from_id(0x01).unwrap(), KdfAlgorithm::Pbkdf2Sha256);
        assert_eq!(KdfAlgorithm::Pbkdf2Sha256.id(), 0x01);
        assert!(matches!(
            KdfAlgorithm::from_id(0x02),
            Err(SecDropError::AlgorithmNotImplemented("Argon2id"))
        ));
        assert!(matches!(
            KdfAlgorithm::from_id(0x09),
            Err(SecDropError::UnsupportedAlgorithm(0x09))
        ));
    }
}
