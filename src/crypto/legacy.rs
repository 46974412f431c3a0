//! Legacy raw key file handling.
//!
//! Early vaults encrypted records under a random 32-byte key stored in
//! plain form at `secret.key`, with no master password at all.  The file
//! exists only to drive the one-time migration that re-encrypts every
//! record under a password-derived key; it is deleted once migration
//! succeeds.

use std::fs;
use std::path::Path;

use crate::crypto::kdf::KEY_LEN;
use crate::errors::{PassVaultError, Result};

/// Returns `true` if a legacy key file is present.
pub fn legacy_key_exists(path: &Path) -> bool {
    path.exists()
}

/// Load the legacy raw key from disk and validate its length.
pub fn load_legacy_key(path: &Path) -> Result<[u8; KEY_LEN]> {
    if !path.exists() {
        return Err(PassVaultError::LegacyKeyError(format!(
            "legacy key not found at {}",
            path.display()
        )));
    }

    let data = fs::read(path)
        .map_err(|e| PassVaultError::LegacyKeyError(format!("failed to read legacy key: {e}")))?;

    let bytes: [u8; KEY_LEN] = data.as_slice().try_into().map_err(|_| {
        PassVaultError::LegacyKeyError(format!(
            "legacy key must be exactly {KEY_LEN} bytes, got {}",
            data.len()
        ))
    })?;

    Ok(bytes)
}

/// Delete the legacy key file after a successful migration.
pub fn remove_legacy_key(path: &Path) -> Result<()> {
    fs::remove_file(path)
        .map_err(|e| PassVaultError::LegacyKeyError(format!("failed to remove legacy key: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_legacy_key_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, [0x42u8; KEY_LEN]).unwrap();

        let key = load_legacy_key(&path).unwrap();
        assert_eq!(key, [0x42u8; KEY_LEN]);
    }

    #[test]
    fn load_legacy_key_fails_if_missing() {
        let dir = TempDir::new().unwrap();
        let result = load_legacy_key(&dir.path().join("nonexistent.key"));
        assert!(result.is_err());
    }

    #[test]
    fn load_legacy_key_fails_on_wrong_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.key");
        fs::write(&path, [0u8; 16]).unwrap();

        let result = load_legacy_key(&path);
        assert!(result.is_err());
    }

    #[test]
    fn remove_legacy_key_deletes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, [0u8; KEY_LEN]).unwrap();

        remove_legacy_key(&path).unwrap();
        assert!(!path.exists());
    }
}
