//! Master-password verification and lockout.
//!
//! The gate never touches credential records to test a password:
//! `config.json` holds an unlock token — the constant `"hello"`
//! encrypted under the current master key — and a candidate password is
//! correct exactly when its derived key opens that token.
//!
//! Repeated failures are rate-limited: after the attempts budget runs
//! out, `verify` rejects outright (no key derivation) until a fixed
//! cooldown elapses, at which point the budget resets.

use std::time::{Duration, Instant};

use zeroize::Zeroize;

use crate::crypto::{derive_key, MasterKey};
use crate::errors::{PassVaultError, Result};
use crate::vault::paths::{FileTxn, VaultPaths};
use crate::vault::record::{CredentialEntry, VaultConfig, VaultFile};
use crate::vault::salt::SaltStore;

/// The constant plaintext sealed inside the unlock token.
const HELLO: &str = "hello";

/// Wrong-password attempts allowed before the gate locks.
pub const MAX_ATTEMPTS: u32 = 5;

/// How long the gate stays locked once the budget is exhausted.
pub const LOCKOUT_COOLDOWN: Duration = Duration::from_secs(30);

/// An unlocked session context.
///
/// Holds the derived master key (zeroized on drop) and is required by
/// every operation that encrypts or decrypts.  The master password
/// itself is never retained here.
pub struct Unlocked {
    key: MasterKey,
}

impl std::fmt::Debug for Unlocked {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("Unlocked").finish_non_exhaustive()
    }
}

impl Unlocked {
    /// Wrap an already-derived master key as a session context.
    ///
    /// Normally produced by the gate; callers that cache a derived key
    /// for a session can rebuild the context from it directly.
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    /// The derived master key for this session.
    pub fn key(&self) -> &MasterKey {
        &self.key
    }
}

/// The unlock state machine.
///
/// Attempts budget and cooldown are in-memory, per process — matching
/// the single-user-session design.  A fresh process starts with a full
/// budget.
pub struct UnlockGate {
    paths: VaultPaths,
    attempts_left: u32,
    locked_until: Option<Instant>,
    max_attempts: u32,
    cooldown: Duration,
}

impl UnlockGate {
    /// Create a gate with the production limits (5 attempts, 30 s).
    pub fn new(paths: VaultPaths) -> Self {
        Self::with_limits(paths, MAX_ATTEMPTS, LOCKOUT_COOLDOWN)
    }

    /// Create a gate with explicit limits.  Used by tests to exercise
    /// the lockout path without waiting out the real cooldown.
    pub fn with_limits(paths: VaultPaths, max_attempts: u32, cooldown: Duration) -> Self {
        Self {
            paths,
            attempts_left: max_attempts,
            locked_until: None,
            max_attempts,
            cooldown,
        }
    }

    /// Wrong-password attempts remaining before lockout.
    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    /// Returns `true` if an unlock token exists.
    pub fn has_master_password(&self) -> Result<bool> {
        Ok(VaultConfig::load(&self.paths.config())?.hello.is_some())
    }

    /// Verify a candidate master password.
    ///
    /// Success resets the attempts budget and returns an `Unlocked`
    /// context.  A wrong password costs one attempt; exhausting the
    /// budget starts the cooldown, during which verification is
    /// rejected before any key derivation.
    pub fn verify(&mut self, password: &str) -> Result<Unlocked> {
        if let Some(until) = self.locked_until {
            let now = Instant::now();
            if now < until {
                let remaining = (until - now).as_secs().max(1);
                return Err(PassVaultError::LockedOut(remaining));
            }
            // Cooldown elapsed — budget resets only now.
            self.locked_until = None;
            self.attempts_left = self.max_attempts;
        }

        let config = VaultConfig::load(&self.paths.config())?;
        let hello = config.hello.ok_or(PassVaultError::NoMasterPassword)?;

        let salt = SaltStore::new(self.paths.salt()).load_or_create()?;
        let mut key_bytes = derive_key(password, &salt)?;
        let key = MasterKey::new(key_bytes);
        key_bytes.zeroize();

        match hello.open(key.as_bytes()) {
            Ok(_) => {
                self.attempts_left = self.max_attempts;
                Ok(Unlocked::new(key))
            }
            Err(_) => {
                self.attempts_left = self.attempts_left.saturating_sub(1);
                if self.attempts_left == 0 {
                    self.locked_until = Some(Instant::now() + self.cooldown);
                }
                Err(PassVaultError::WrongPassword)
            }
        }
    }

    /// Set the initial master password and return an unlocked context.
    ///
    /// Three starting states are handled:
    /// - Legacy key file plus existing records: every record is
    ///   re-encrypted under the new derived key before anything is
    ///   written; any record that fails to decrypt aborts the whole
    ///   migration with the store byte-for-byte unchanged.
    /// - Existing records with no legacy key: they can never be
    ///   decrypted again, so `wipe_existing` must be `true`
    ///   (caller-confirmed) or the call fails with `WipeDeclined`.
    /// - Fresh vault: persists the salt and the unlock token.  A
    ///   legacy key file with no records to migrate is deleted.
    pub fn create_master_password(
        &mut self,
        password: &str,
        wipe_existing: bool,
    ) -> Result<Unlocked> {
        if self.has_master_password()? {
            return Err(PassVaultError::MasterPasswordAlreadySet);
        }

        self.paths.ensure_data_dir()?;
        let vault = VaultFile::load(&self.paths.passwords(), &self.paths.passwords_backup())?;

        let legacy_path = self.paths.legacy_key();
        let migrating =
            crate::crypto::legacy::legacy_key_exists(&legacy_path) && !vault.is_empty();

        // Decrypt everything under the legacy key BEFORE creating any
        // crypto material, so a failed migration has zero side effects.
        let mut plaintext: Vec<(String, String, String)> = Vec::new();
        if migrating {
            let legacy_key = MasterKey::new(crate::crypto::legacy::load_legacy_key(&legacy_path)?);
            for (site, entries) in vault.sites() {
                for entry in entries {
                    let user = legacy_key.open_str(&entry.username).map_err(|_| {
                        PassVaultError::MigrationFailed(format!(
                            "cannot decrypt entries for '{site}' under the legacy key"
                        ))
                    })?;
                    let pw = legacy_key.open_str(&entry.password).map_err(|_| {
                        PassVaultError::MigrationFailed(format!(
                            "cannot decrypt entries for '{site}' under the legacy key"
                        ))
                    })?;
                    plaintext.push((site.clone(), user, pw));
                }
            }
        } else if !vault.is_empty() && !wipe_existing {
            return Err(PassVaultError::WipeDeclined);
        }

        let salt = SaltStore::new(self.paths.salt()).load_or_create()?;
        let mut key_bytes = derive_key(password, &salt)?;
        let key = MasterKey::new(key_bytes);
        key_bytes.zeroize();

        let mut config = VaultConfig::load(&self.paths.config())?;
        config.hello = Some(key.seal_str(HELLO)?);

        if migrating {
            let mut migrated = VaultFile::default();
            for (site, mut user, mut pw) in plaintext {
                let entry = CredentialEntry {
                    username: key.seal_str(&user)?,
                    password: key.seal_str(&pw)?,
                };
                user.zeroize();
                pw.zeroize();
                migrated.push_entry(&site, entry);
            }

            // Store and unlock token land together; the legacy key is
            // deleted only once both are committed.
            let mut txn = FileTxn::new();
            txn.stage(&self.paths.passwords(), &migrated.to_bytes()?)?;
            txn.stage(&self.paths.config(), &config.to_bytes()?)?;
            txn.commit()?;
            crate::crypto::legacy::remove_legacy_key(&legacy_path)?;
        } else if !vault.is_empty() {
            // Confirmed wipe of undecryptable records.
            let mut txn = FileTxn::new();
            txn.stage(&self.paths.passwords(), &VaultFile::default().to_bytes()?)?;
            txn.stage(&self.paths.config(), &config.to_bytes()?)?;
            txn.commit()?;
        } else {
            config.save(&self.paths.config())?;
            // A legacy key with no records to migrate is loose key
            // material; remove it rather than leave it behind.
            if crate::crypto::legacy::legacy_key_exists(&legacy_path) {
                crate::crypto::legacy::remove_legacy_key(&legacy_path)?;
            }
        }

        self.attempts_left = self.max_attempts;
        self.locked_until = None;
        Ok(Unlocked::new(key))
    }
}
