//! Error types for SECDROP

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecDropError {
    #[error("Secure randomness unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Cipher failure: {0}")]
    CipherFailure(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Unsupported format version 0x{0:02x}")]
    UnsupportedFormatVersion(u8),

    #[error("Unsupported key derivation algorithm 0x{0:02x}")]
    UnsupportedAlgorithm(u8),

    #[error("Key derivation algorithm {0} is reserved but not implemented")]
    AlgorithmNotImplemented(&'static str),

    #[error("Authentication failed - wrong passphrase or tampered payload")]
    AuthenticationFailed,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, SecDropError>;

impl SecDropError {
    /// Failures that abort an encryption outright. None of them leave a
    /// partial payload behind.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EntropyUnavailable(_)
                | Self::CipherFailure(_)
                | Self::KeyDerivationFailed(_)
                | Self::Task(_)
        )
    }

    pub fn is_tamper_signal(&self) -> bool {
        matches!(self, Self::AuthenticationFailed)
    }
}

impl From<tokio::task::JoinError> for SecDropError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(e.to_string())
    }
}
