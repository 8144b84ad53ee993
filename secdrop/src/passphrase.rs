//! Random passphrase generation

use rand_core::{CryptoRng, OsRng, RngCore};
use zeroize::Zeroizing;

use crate::crypto::fill_random;
use crate::error::{Result, SecDropError};

/// Default generated passphrase length
pub const DEFAULT_PASSPHRASE_LENGTH: usize = 24;

/// Upper bound accepted by the generator
pub const MAX_PASSPHRASE_LENGTH: usize = 1024;

/// Characters a generated passphrase is drawn from
pub const PASSPHRASE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// Generates a passphrase from the OS CSPRNG.
pub fn generate_passphrase(length: usize) -> Result<Zeroizing<String>> {
    generate_passphrase_with_rng(&mut OsRng, length)
}

/// Generates a passphrase of `length` characters.
///
/// Each character consumes one random byte reduced modulo the alphabet size.
/// 256 is not a multiple of 70, so the first 46 characters of the alphabet
/// are slightly more likely (4/256 vs 3/256). Good enough for a
/// human-handled passphrase; not meant as key material.
pub fn generate_passphrase_with_rng<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    length: usize,
) -> Result<Zeroizing<String>> {
    if length == 0 || length > MAX_PASSPHRASE_LENGTH {
        return Err(SecDropError::InvalidInput(format!(
            "passphrase length must be between 1 and {} (got {})",
            MAX_PASSPHRASE_LENGTH, length
        )));
    }

    let mut bytes = Zeroizing::new(vec![0u8; length]);
    fill_random(rng, &mut bytes)?;

    let passphrase: String = bytes
        .iter()
        .map(|b| PASSPHRASE_ALPHABET[*b as usize % PASSPHRASE_ALPHABET.len()] as char)
        .collect();
    Ok(Zeroizing::new(passphrase))
}
