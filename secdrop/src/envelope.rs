//! Wire codec for `SECDROP-P:` payloads
//!
//! ```text
//! "SECDROP-P:" + base64( 0x02 | algo | salt[16] | nonce[12] | ciphertext[n] | tag[16] )
//! ```
//!
//! No length prefixes: everything but the ciphertext is fixed-size, so its
//! length is `total - MIN_ENVELOPE_LEN`.

use base64::{
    alphabet,
    engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD},
    engine::DecodePaddingMode,
    Engine,
};
use serde::Serialize;

use crate::crypto::{
    DerivationParameters, Sealed, ALGO_PBKDF2_SHA256, NONCE_LEN, SALT_LEN, TAG_LEN,
};
use crate::error::{Result, SecDropError};

/// Text prefix of every payload
pub const PAYLOAD_PREFIX: &str = "SECDROP-P:";

/// Current wire layout version
pub const FORMAT_VERSION: u8 = 0x02;

/// Version byte + algorithm byte
const HEADER_LEN: usize = 2;

/// Size of an envelope holding an empty secret
pub const MIN_ENVELOPE_LEN: usize = HEADER_LEN + SALT_LEN + NONCE_LEN + TAG_LEN;

/// Decoder matching what browsers' `atob` accepts: padding optional,
/// non-zero trailing bits ignored. Encoding always uses padded `STANDARD`.
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

const SALT_OFFSET: usize = HEADER_LEN;
const NONCE_OFFSET: usize = SALT_OFFSET + SALT_LEN;
const CIPHERTEXT_OFFSET: usize = NONCE_OFFSET + NONCE_LEN;

/// Binary envelope. Built once per encryption and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    format_version: u8,
    algo_version: u8,
    salt: [u8; SALT_LEN],
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
    tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Assembles a current-format envelope from the pipeline outputs.
    pub fn new(derivation: &DerivationParameters, nonce: [u8; NONCE_LEN], sealed: Sealed) -> Self {
        Self::from_parts(
            FORMAT_VERSION,
            derivation.algorithm.id(),
            derivation.salt,
            nonce,
            sealed.ciphertext,
            sealed.tag,
        )
    }

    pub fn from_parts(
        format_version: u8,
        algo_version: u8,
        salt: [u8; SALT_LEN],
        nonce: [u8; NONCE_LEN],
        ciphertext: Vec<u8>,
        tag: [u8; TAG_LEN],
    ) -> Self {
        Self {
            format_version,
            algo_version,
            salt,
            nonce,
            ciphertext,
            tag,
        }
    }

    pub fn format_version(&self) -> u8 {
        self.format_version
    }

    pub fn algo_version(&self) -> u8 {
        self.algo_version
    }

    pub fn salt(&self) -> &[u8; SALT_LEN] {
        &self.salt
    }

    pub fn nonce(&self) -> &[u8; NONCE_LEN] {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn tag(&self) -> &[u8; TAG_LEN] {
        &self.tag
    }

    /// Total serialized length
    pub fn byte_len(&self) -> usize {
        MIN_ENVELOPE_LEN + self.ciphertext.len()
    }

    /// Serialize to bytes in wire order
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.byte_len());
        out.push(self.format_version);
        out.push(self.algo_version);
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.nonce);
        out.extend_from_slice(&self.ciphertext);
        out.extend_from_slice(&self.tag);
        out
    }

    /// Deserialize from bytes. Versions are carried through unchecked.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_ENVELOPE_LEN {
            return Err(SecDropError::MalformedPayload(format!(
                "envelope is {} bytes, minimum is {}",
                data.len(),
                MIN_ENVELOPE_LEN
            )));
        }

        let tag_offset = data.len() - TAG_LEN;
        let mut salt = [0u8; SALT_LEN];
        salt.copy_from_slice(&data[SALT_OFFSET..NONCE_OFFSET]);
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&data[NONCE_OFFSET..CIPHERTEXT_OFFSET]);
        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&data[tag_offset..]);

        Ok(Self {
            format_version: data[0],
            algo_version: data[1],
            salt,
            nonce,
            ciphertext: data[CIPHERTEXT_OFFSET..tag_offset].to_vec(),
            tag,
        })
    }

    /// Text form: prefix plus padded standard base64
    pub fn encode(&self) -> String {
        let mut out = String::from(PAYLOAD_PREFIX);
        STANDARD.encode_string(self.to_bytes(), &mut out);
        out
    }

    /// Decode used before decryption. Unlike [`parse_payload`] it reports
    /// why a payload was rejected.
    pub fn decode(payload: &str) -> Result<Self> {
        let bytes = decode_payload_bytes(payload)?;
        Self::from_bytes(&bytes)
    }

    /// Structural view, as returned by [`parse_payload`]
    pub fn fields(&self) -> EnvelopeFields {
        EnvelopeFields {
            format_version: self.format_version,
            algo_version: self.algo_version,
            salt: self.salt,
            nonce: self.nonce,
            ciphertext_len: self.ciphertext.len(),
        }
    }
}

fn decode_payload_bytes(payload: &str) -> Result<Vec<u8>> {
    let body = payload.strip_prefix(PAYLOAD_PREFIX).ok_or_else(|| {
        SecDropError::MalformedPayload(format!("missing {} prefix", PAYLOAD_PREFIX))
    })?;

    // Text transport may wrap or indent the base64 body.
    let body: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    LENIENT_STANDARD
        .decode(body)
        .map_err(|e| SecDropError::MalformedPayload(format!("invalid base64: {}", e)))
}

/// Structural fields of a payload. Diagnostic only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeFields {
    pub format_version: u8,
    pub algo_version: u8,
    #[serde(serialize_with = "hex_bytes")]
    pub salt: [u8; SALT_LEN],
    #[serde(serialize_with = "hex_bytes")]
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext_len: usize,
}

impl EnvelopeFields {
    pub fn is_current_format(&self) -> bool {
        self.format_version == FORMAT_VERSION && self.algo_version == ALGO_PBKDF2_SHA256
    }
}

fn hex_bytes<S: serde::Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

/// Advisory parse of a payload string.
///
/// Returns `None` for a missing prefix, bad base64 or an undersized buffer.
/// Unknown version bytes are reported as-is; version gating is left to the
/// caller. Never use the result for security decisions.
pub fn parse_payload(payload: &str) -> Option<EnvelopeFields> {
    let bytes = decode_payload_bytes(payload).ok()?;
    Envelope::from_bytes(&bytes).ok().map(|e| e.fields())
}
