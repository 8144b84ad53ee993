//! Crypto module - PBKDF2-SHA256 key derivation, AES-256-GCM, entropy

mod aead;
mod kdf;
mod random;

#[cfg(test)]
pub(crate) use random::testing;

pub use aead::{open, seal, Sealed, ASSOCIATED_DATA, TAG_LEN};
pub use kdf::{
    derive_key, DerivationParameters, DerivedKey, KdfAlgorithm, ALGO_ARGON2ID_RESERVED,
    ALGO_PBKDF2_SHA256, KEY_LEN, PBKDF2_ITERATIONS,
};
pub use random::{fill_random, generate_nonce, generate_salt, NONCE_LEN, SALT_LEN};
