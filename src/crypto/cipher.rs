//! AES-256-GCM authenticated encryption as text-safe tokens.
//!
//! Each call to `Token::seal` generates a fresh random 12-byte nonce,
//! prepends it to the ciphertext, and base64-encodes the whole buffer so
//! the result can be stored as a plain string inside JSON documents.
//! `Token::open` decodes, splits the nonce back out, and verifies the
//! auth tag before returning any plaintext.
//!
//! Layout of the encoded byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KEY_LEN;
use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// An opaque, self-contained authenticated ciphertext.
///
/// Serializes as a plain string, so a `Token` can sit directly inside
/// the persisted JSON records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Encrypt `plaintext` under a 32-byte `key`.
    ///
    /// A fresh random nonce is generated per call, so sealing the same
    /// plaintext twice yields different tokens.
    pub fn seal(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<Self> {
        let cipher = Aes256Gcm::new_from_slice(key)
            .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

        // Prepend the nonce so the token is self-contained.
        let mut buf = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        buf.extend_from_slice(&nonce);
        buf.extend_from_slice(&ciphertext);

        Ok(Self(BASE64.encode(buf)))
    }

    /// Decrypt this token with `key` and return the plaintext.
    ///
    /// Fails closed: a malformed token, truncation, tampering, or a key
    /// derived from the wrong password all yield `AuthenticationFailed`,
    /// never partial plaintext.
    pub fn open(&self, key: &[u8; KEY_LEN]) -> Result<Vec<u8>> {
        let buf = BASE64
            .decode(&self.0)
            .map_err(|_| PassVaultError::AuthenticationFailed)?;

        // Make sure we have at least a nonce worth of bytes.
        if buf.len() < NONCE_LEN {
            return Err(PassVaultError::AuthenticationFailed);
        }

        let (nonce_bytes, ciphertext) = buf.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|_| PassVaultError::AuthenticationFailed)?;

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| PassVaultError::AuthenticationFailed)
    }

    /// Build a token from its stored string form without validation.
    ///
    /// Any corruption shows up later as `AuthenticationFailed` on `open`.
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// The stored string form of the token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
