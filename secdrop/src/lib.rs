//! # SECDROP - passphrase-sealed payloads for short secrets
//!
//! Encrypts an API key under a passphrase into a self-describing text blob:
//!
//! ```text
//! "SECDROP-P:" + base64( 0x02 | 0x01 | salt[16] | nonce[12] | ciphertext[n] | tag[16] )
//! ```
//!
//! ## Pipeline
//! - PBKDF2-HMAC-SHA256, 100 000 rounds, fresh 16-byte salt -> 32-byte key
//! - AES-256-GCM, fresh 12-byte nonce, AAD `api-key-secure-send-v1`
//! - Binary envelope -> standard base64 with the `SECDROP-P:` prefix
//!
//! ```no_run
//! let payload = secdrop::encrypt_secure_drop("sk-test-12345", "correct horse battery staple")?;
//! let fields = secdrop::parse_payload(&payload).expect("fresh payload parses");
//! assert_eq!(fields.ciphertext_len, 13);
//! # Ok::<(), secdrop::SecDropError>(())
//! ```

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod passphrase;
pub mod secure_drop;

// Re-exports
pub use config::{LogConfig, SecDropConfig};
pub use envelope::{parse_payload, Envelope, EnvelopeFields, FORMAT_VERSION, PAYLOAD_PREFIX};
pub use error::{Result, SecDropError};
pub use passphrase::{generate_passphrase, DEFAULT_PASSPHRASE_LENGTH};
pub use secure_drop::{
    decrypt_secure_drop, decrypt_secure_drop_async, encrypt_secure_drop,
    encrypt_secure_drop_async, encrypt_secure_drop_with_rng,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
