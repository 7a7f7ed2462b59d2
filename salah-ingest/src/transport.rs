//! Encrypted configuration payloads (the text carried by a community's QR code).
//!
//! Layout after Base64 decoding: 16-byte IV followed by AES-256-CBC ciphertext with
//! PKCS#7 padding. The plaintext is JSON `{"alias", "serverUrl", "apiKey"}`.

use aes::cipher::{BlockDecryptMut, KeyIvInit, block_padding::Pkcs7};
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};
use thiserror::Error;

type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

const IV_LEN: usize = 16;
pub const KEY_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    pub alias: String,
    pub server_url: String,
    pub api_key: String,
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("payload too short: {0} bytes, need an IV and at least one block")]
    TooShort(usize),

    #[error("transport key must be {KEY_LEN} bytes, got {0}")]
    KeyLength(usize),

    #[error("decryption failed: wrong key or corrupted payload")]
    Decrypt,

    #[error("decrypted payload is empty")]
    EmptyPlaintext,

    #[error("decrypted payload is not a server config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decrypt and decode a scanned configuration payload.
pub fn decrypt_config_payload(payload_b64: &str, key: &[u8]) -> Result<ServerConfig, TransportError> {
    if key.len() != KEY_LEN {
        return Err(TransportError::KeyLength(key.len()));
    }

    let bytes = general_purpose::STANDARD.decode(payload_b64.trim())?;
    if bytes.len() <= IV_LEN {
        return Err(TransportError::TooShort(bytes.len()));
    }
    let (iv, ciphertext) = bytes.split_at(IV_LEN);

    let plaintext = Aes256CbcDec::new_from_slices(key, iv)
        .map_err(|_| TransportError::KeyLength(key.len()))?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| TransportError::Decrypt)?;

    if plaintext.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(TransportError::EmptyPlaintext);
    }

    let cfg: ServerConfig = serde_json::from_slice(&plaintext)?;
    tracing::debug!(alias = %cfg.alias, "decrypted configuration payload");
    Ok(cfg)
}
