//! Encrypt / decrypt pipeline: derive -> seal -> encode, and back.

use rand_core::{CryptoRng, OsRng, RngCore};
use secrecy::SecretString;
use zeroize::Zeroizing;

use crate::crypto::{
    derive_key, generate_nonce, generate_salt, open, seal, DerivationParameters, KdfAlgorithm,
    ASSOCIATED_DATA,
};
use crate::envelope::{Envelope, FORMAT_VERSION};
use crate::error::{Result, SecDropError};

/// Encrypts `secret` under `passphrase` and returns a `SECDROP-P:` payload.
///
/// Salt and nonce come fresh from the OS CSPRNG on every call. An empty
/// secret is valid; an empty passphrase is not.
pub fn encrypt_secure_drop(secret: &str, passphrase: &str) -> Result<String> {
    encrypt_secure_drop_with_rng(&mut OsRng, secret, passphrase)
}

/// [`encrypt_secure_drop`] with an explicit randomness source.
pub fn encrypt_secure_drop_with_rng<R: RngCore + CryptoRng + ?Sized>(
    rng: &mut R,
    secret: &str,
    passphrase: &str,
) -> Result<String> {
    if passphrase.is_empty() {
        return Err(SecDropError::InvalidInput("passphrase must not be empty".into()));
    }
    let passphrase = SecretString::from(passphrase.to_string());

    let params = DerivationParameters::new(generate_salt(rng)?, KdfAlgorithm::Pbkdf2Sha256);
    let nonce = generate_nonce(rng)?;

    let key = derive_key(&passphrase, &params)?;
    let sealed = seal(&key, &nonce, secret.as_bytes(), ASSOCIATED_DATA)?;
    let envelope = Envelope::new(&params, nonce, sealed);

    tracing::debug!(
        format_version = envelope.format_version(),
        algo_version = envelope.algo_version(),
        envelope_len = envelope.byte_len(),
        "sealed secure drop payload"
    );
    Ok(envelope.encode())
}

/// Opens a payload produced by [`encrypt_secure_drop`].
///
/// Only format 0x02 is accepted; there is no best-effort parsing of other
/// layouts. The algorithm byte must name an implemented KDF.
pub fn decrypt_secure_drop(payload: &str, passphrase: &str) -> Result<Zeroizing<String>> {
    let envelope = Envelope::decode(payload)?;

    if envelope.format_version() != FORMAT_VERSION {
        return Err(SecDropError::UnsupportedFormatVersion(envelope.format_version()));
    }
    let algorithm = KdfAlgorithm::from_id(envelope.algo_version())?;

    let passphrase = SecretString::from(passphrase.to_string());
    let params = DerivationParameters::new(*envelope.salt(), algorithm);
    let key = derive_key(&passphrase, &params)?;

    let plaintext = open(
        &key,
        envelope.nonce(),
        envelope.ciphertext(),
        envelope.tag(),
        ASSOCIATED_DATA,
    )
    .inspect_err(|_| tracing::warn!("secure drop payload failed authentication"))?;

    let secret = std::str::from_utf8(&plaintext)
        .map_err(|_| SecDropError::MalformedPayload("decrypted secret is not UTF-8".into()))?;
    Ok(Zeroizing::new(secret.to_string()))
}

/// Runs [`encrypt_secure_drop`] on the blocking pool.
pub async fn encrypt_secure_drop_async(secret: String, passphrase: String) -> Result<String> {
    let secret = Zeroizing::new(secret);
    let passphrase = Zeroizing::new(passphrase);
    tokio::task::spawn_blocking(move || encrypt_secure_drop(&secret, &passphrase)).await?
}

/// Runs [`decrypt_secure_drop`] on the blocking pool.
pub async fn decrypt_secure_drop_async(
    payload: String,
    passphrase: String,
) -> Result<Zeroizing<String>> {
    let passphrase = Zeroizing::new(passphrase);
    tokio::task::spawn_blocking(move || decrypt_secure_drop(&payload, &passphrase)).await?
}

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::crypto::testing::FailingRng;
    use crate::envelope::parse_payload;

    #[test]
    fn test_concrete_scenario() {
        let payload = encrypt_secure_drop("sk-test-12345", "correct horse battery staple").unwrap();

        let body = payload.strip_prefix("SECDROP-P:").unwrap();
        assert!(body
            .trim_end_matches('=')
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/'));

        let bytes = STANDARD.decode(body).unwrap();
        assert_eq!(bytes[0], 2);
        assert_eq!(bytes[1], 1);
        assert_eq!(bytes.len(), 59);
    }

    #[test]
    fn test_roundtrip() {
        let payload = encrypt_secure_drop("sk-live-xyz", "pass").unwrap();
        let secret = decrypt_secure_drop(&payload, "pass").unwrap();
        assert_eq!(secret.as_str(), "sk-live-xyz");
    }

    #[test]
    fn test_same_seed_same_payload() {
        let a = encrypt_secure_drop_with_rng(&mut StdRng::seed_from_u64(7), "k", "p").unwrap();
        let b = encrypt_secure_drop_with_rng(&mut StdRng::seed_from_u64(7), "k", "p").unwrap();
        let c = encrypt_secure_drop_with_rng(&mut StdRng::seed_from_u64(8), "k", "p").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_empty_secret() {
        let payload = encrypt_secure_drop("", "pass").unwrap();
        let fields = parse_payload(&payload).unwrap();
        assert_eq!(fields.ciphertext_len, 0);
        assert_eq!(decrypt_secure_drop(&payload, "pass").unwrap().as_str(), "");
    }

    #[test]
    fn test_empty_passphrase_rejected() {
        let err = encrypt_secure_drop("secret", "").unwrap_err();
        assert!(matches!(err, SecDropError::InvalidInput(_)));
    }

    #[test]
    fn test_entropy_failure_aborts() {
        let err = encrypt_secure_drop_with_rng(&mut FailingRng, "secret", "pass").unwrap_err();
        assert!(matches!(err, SecDropError::EntropyUnavailable(_)));
    }

    #[test]
    fn test_wrong_passphrase() {
        let payload = encrypt_secure_drop("secret", "right").unwrap();
        let err = decrypt_secure_drop(&payload, "wrong").unwrap_err();
        assert!(err.is_tamper_signal());
    }

    #[test]
    fn test_version_gating() {
        let payload = encrypt_secure_drop("secret", "pass").unwrap();
        let mut bytes = STANDARD.decode(&payload["SECDROP-P:".len()..]).unwrap();

        bytes[1] = 0x02;
        let argon = format!("SECDROP-P:{}", STANDARD.encode(&bytes));
        assert!(matches!(
            decrypt_secure_drop(&argon, "pass"),
            Err(SecDropError::AlgorithmNotImplemented(_))
        ));

        bytes[1] = 0x01;
        bytes[0] = 0x01;
        let legacy = format!("SECDROP-P:{}", STANDARD.encode(&bytes));
        assert!(matches!(
            decrypt_secure_drop(&legacy, "pass"),
            Err(SecDropError::UnsupportedFormatVersion(0x01))
        ));
    }

    #[tokio::test]
    async fn test_async_roundtrip() {
        let payload = encrypt_secure_drop_async("sk-async".into(), "pass".into())
            .await
            .unwrap();
        let secret = decrypt_secure_drop_async(payload, "pass".into()).await.unwrap();
        assert_eq!(secret.as_str(), "sk-async");
    }
}
