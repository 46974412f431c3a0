//! The per-vault salt.
//!
//! A single random 16-byte value, created once and immutable for the
//! vault's lifetime.  Every password-derived key — unlock checks and
//! rotations alike — reuses this salt; only the password input changes.
//! Regenerating it would silently invalidate every stored ciphertext,
//! so an existing salt is never replaced.

use std::fs;
use std::path::PathBuf;

use crate::crypto::kdf::{generate_salt, SALT_LEN};
use crate::errors::{PassVaultError, Result};
use crate::vault::paths::write_atomic;

/// Persists the single random per-vault salt.
pub struct SaltStore {
    path: PathBuf,
}

impl SaltStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns `true` if a salt has already been created.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Return the existing salt, or generate and persist a fresh one.
    ///
    /// Idempotent: once created, every later call returns the same
    /// bytes.  A salt file of the wrong length is treated as corruption
    /// rather than silently regenerated.
    pub fn load_or_create(&self) -> Result<[u8; SALT_LEN]> {
        if self.path.exists() {
            let data = fs::read(&self.path)?;
            let salt: [u8; SALT_LEN] = data
                .as_slice()
                .try_into()
                .map_err(|_| PassVaultError::StoreCorrupted(self.path.clone()))?;
            return Ok(salt);
        }

        let salt = generate_salt()?;

        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        write_atomic(&self.path, &salt)?;

        // On Unix, restrict permissions to owner-only read/write.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(salt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_or_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SaltStore::new(dir.path().join("salt.bin"));

        let first = store.load_or_create().unwrap();
        let second = store.load_or_create().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn existing_salt_is_returned_byte_for_byte() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("salt.bin");
        fs::write(&path, [7u8; SALT_LEN]).unwrap();

        let salt = SaltStore::new(path).load_or_create().unwrap();
        assert_eq!(salt, [7u8; SALT_LEN]);
    }

    #[test]
    fn wrong_length_salt_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("salt.bin");
        fs::write(&path, [0u8; 8]).unwrap();

        let result = SaltStore::new(path).load_or_create();
        assert!(matches!(result, Err(PassVaultError::StoreCorrupted(_))));
    }
}
