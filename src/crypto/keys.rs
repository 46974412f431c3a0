//! The `MasterKey` wrapper.
//!
//! Holds the 32-byte key derived from the master password and zeroes its
//! memory when dropped, so the key cannot linger after a session ends.

use zeroize::Zeroize;

use crate::crypto::cipher::Token;
use crate::crypto::kdf::KEY_LEN;
use crate::errors::{PassVaultError, Result};

/// A wrapper around a 32-byte derived key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw derived bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Encrypt a UTF-8 string under this key.
    pub fn seal_str(&self, plaintext: &str) -> Result<Token> {
        Token::seal(&self.bytes, plaintext.as_bytes())
    }

    /// Decrypt a token under this key and return it as a UTF-8 string.
    ///
    /// On invalid UTF-8 the decrypted bytes are zeroized before the
    /// error is returned.
    pub fn open_str(&self, token: &Token) -> Result<String> {
        let plaintext = token.open(&self.bytes)?;
        String::from_utf8(plaintext).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            PassVaultError::SerializationError("decrypted value is not valid UTF-8".to_string())
        })
    }
}
