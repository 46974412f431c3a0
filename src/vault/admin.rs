//! Master-password rotation and full wipe.
//!
//! Both operations rewrite the credential store and the unlock token as
//! one logical transaction: new contents are staged to temp files first
//! and the renames committed back to back, so a crash before commit
//! leaves the old password working and the old data intact.

use zeroize::Zeroize;

use crate::crypto::{derive_key, MasterKey};
use crate::errors::{PassVaultError, Result};
use crate::vault::gate::Unlocked;
use crate::vault::paths::{FileTxn, VaultPaths};
use crate::vault::record::{CredentialEntry, VaultConfig, VaultFile};
use crate::vault::salt::SaltStore;

/// The constant plaintext sealed inside the unlock token.
const HELLO: &str = "hello";

/// Outcome of a password rotation.
///
/// Entries that could not be decrypted under the old key are dropped
/// from the rewritten store; `dropped` makes that data loss visible so
/// callers can warn instead of discarding silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationReport {
    /// Entries successfully re-encrypted under the new key.
    pub reencrypted: usize,
    /// Entries dropped because they failed to decrypt under the old key.
    pub dropped: usize,
}

/// Orchestrates bulk re-encryption and wipe, keeping the unlock token
/// and the credential store consistent.
pub struct VaultAdmin {
    paths: VaultPaths,
}

impl VaultAdmin {
    pub fn new(paths: VaultPaths) -> Self {
        Self { paths }
    }

    /// Re-encrypt every record under a key derived from `new_password`
    /// and replace the unlock token to match.
    ///
    /// The old and new keys share the single per-vault salt; only the
    /// password input changes.  `old_password` is verified against the
    /// unlock token before any record is touched.
    pub fn rotate_password(&self, old_password: &str, new_password: &str) -> Result<RotationReport> {
        let mut config = VaultConfig::load(&self.paths.config())?;
        let hello = config
            .hello
            .as_ref()
            .ok_or(PassVaultError::NoMasterPassword)?;

        let salt = SaltStore::new(self.paths.salt()).load_or_create()?;

        let mut old_bytes = derive_key(old_password, &salt)?;
        let old_key = MasterKey::new(old_bytes);
        old_bytes.zeroize();

        hello
            .open(old_key.as_bytes())
            .map_err(|_| PassVaultError::WrongPassword)?;

        let mut new_bytes = derive_key(new_password, &salt)?;
        let new_key = MasterKey::new(new_bytes);
        new_bytes.zeroize();

        let vault = VaultFile::load(&self.paths.passwords(), &self.paths.passwords_backup())?;

        let mut rewritten = VaultFile::default();
        let mut report = RotationReport {
            reencrypted: 0,
            dropped: 0,
        };

        for (site, entries) in vault.sites() {
            for entry in entries {
                let (mut user, mut pw) = match (
                    old_key.open_str(&entry.username),
                    old_key.open_str(&entry.password),
                ) {
                    (Ok(u), Ok(p)) => (u, p),
                    _ => {
                        report.dropped += 1;
                        continue;
                    }
                };

                let reencrypted = CredentialEntry {
                    username: new_key.seal_str(&user)?,
                    password: new_key.seal_str(&pw)?,
                };
                user.zeroize();
                pw.zeroize();

                rewritten.push_entry(site, reencrypted);
                report.reencrypted += 1;
            }
        }

        config.hello = Some(new_key.seal_str(HELLO)?);

        let mut txn = FileTxn::new();
        txn.stage(&self.paths.passwords(), &rewritten.to_bytes()?)?;
        txn.stage(&self.paths.config(), &config.to_bytes()?)?;
        txn.commit()?;

        Ok(report)
    }

    /// Replace the store with an empty one and regenerate the unlock
    /// token under the unchanged current key, so the vault stays
    /// unlockable with the same password but holds zero records.
    pub fn wipe_all(&self, ctx: &Unlocked) -> Result<()> {
        let mut config = VaultConfig::load(&self.paths.config())?;
        config.hello = Some(ctx.key().seal_str(HELLO)?);

        let mut txn = FileTxn::new();
        txn.stage(&self.paths.passwords(), &VaultFile::default().to_bytes()?)?;
        txn.stage(&self.paths.config(), &config.to_bytes()?)?;
        txn.commit()
    }
}
