//! Credential CRUD over the persisted store.
//!
//! `CredentialStore` owns the read/modify/write discipline: every
//! mutating call reads the whole file, mutates in memory, and writes the
//! whole file back atomically.  It holds no decrypted state of its own —
//! operations that need plaintext take the `Unlocked` session context.

use std::collections::BTreeMap;

use crate::errors::{PassVaultError, Result};
use crate::vault::gate::Unlocked;
use crate::vault::paths::VaultPaths;
use crate::vault::record::{CredentialEntry, VaultFile};

/// A decrypted credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// One row of the site listing shown to the user.
///
/// `label` is the site name alone when the site has a single entry, and
/// `"site | username"` per entry when it has several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDisplayItem {
    pub label: String,
    pub site: String,
    pub username: Option<String>,
}

/// Placeholder label for an entry whose username failed to decrypt.
const UNDECRYPTABLE: &str = "<error>";

pub struct CredentialStore {
    paths: VaultPaths,
}

impl CredentialStore {
    pub fn new(paths: VaultPaths) -> Self {
        Self { paths }
    }

    fn load(&self) -> Result<VaultFile> {
        VaultFile::load(&self.paths.passwords(), &self.paths.passwords_backup())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Encrypt and append a credential entry for `site`.
    ///
    /// Creates the site record if absent.  Username uniqueness is NOT
    /// enforced here — callers wanting replace-or-reject semantics
    /// check `find_by_username` first and decide.
    pub fn add(&self, site: &str, username: &str, password: &str, ctx: &Unlocked) -> Result<()> {
        validate_site(site)?;
        if username.is_empty() {
            return Err(PassVaultError::InvalidInput(
                "username cannot be empty".into(),
            ));
        }
        if password.is_empty() {
            return Err(PassVaultError::InvalidInput(
                "password cannot be empty".into(),
            ));
        }

        self.paths.ensure_data_dir()?;
        let mut vault = self.load()?;

        let entry = CredentialEntry {
            username: ctx.key().seal_str(username)?,
            password: ctx.key().seal_str(password)?,
        };
        vault.push_entry(site, entry);

        vault.save(&self.paths.passwords())
    }

    /// Delete entries for `site`.
    ///
    /// With no username, the entire site record is removed.  With a
    /// username, each entry's username field is decrypted to find a
    /// match; entries that fail to decrypt are conservatively kept —
    /// never deleted on an ambiguous outcome.  Removing the last entry
    /// removes the site record.  Returns whether anything was deleted.
    pub fn delete(&self, site: &str, username: Option<&str>, ctx: &Unlocked) -> Result<bool> {
        validate_site(site)?;
        let mut vault = self.load()?;

        let Some(entries) = vault.entries(site).cloned() else {
            return Ok(false);
        };

        let Some(username) = username else {
            vault.remove_site(site);
            vault.save(&self.paths.passwords())?;
            return Ok(true);
        };

        let mut kept: Vec<CredentialEntry> = Vec::with_capacity(entries.len());
        let mut deleted = false;
        for entry in entries {
            match ctx.key().open_str(&entry.username) {
                Ok(decrypted) if decrypted == username => deleted = true,
                // Keep on match failure AND on decrypt failure.
                _ => kept.push(entry),
            }
        }

        if deleted {
            vault.set_entries(site, kept);
            vault.save(&self.paths.passwords())?;
        }
        Ok(deleted)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Decrypt every entry for `site`.
    ///
    /// No partial success: if any single entry fails to decrypt the
    /// whole call fails with `DecryptionFailed`.  Callers wanting
    /// per-entry fault isolation use `list_all`.
    pub fn get(&self, site: &str, ctx: &Unlocked) -> Result<Vec<Credential>> {
        validate_site(site)?;
        let vault = self.load()?;

        let entries = vault
            .entries(site)
            .ok_or_else(|| PassVaultError::NotFound(site.to_string()))?;

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries {
            let credential = self
                .decrypt_entry(entry, ctx)
                .map_err(|_| PassVaultError::DecryptionFailed(site.to_string()))?;
            results.push(credential);
        }
        Ok(results)
    }

    /// Returns `true` if `site` has an entry whose decrypted username
    /// equals `username`.  Entries that fail to decrypt never match.
    pub fn find_by_username(&self, site: &str, username: &str, ctx: &Unlocked) -> Result<bool> {
        validate_site(site)?;
        let vault = self.load()?;

        let Some(entries) = vault.entries(site) else {
            return Ok(false);
        };

        Ok(entries
            .iter()
            .any(|entry| matches!(ctx.key().open_str(&entry.username), Ok(u) if u == username)))
    }

    /// Best-effort decryption of every record.
    ///
    /// An entry that fails to decrypt yields a `None` placeholder in
    /// its site's list instead of aborting the listing.
    pub fn list_all(&self, ctx: &Unlocked) -> Result<BTreeMap<String, Vec<Option<Credential>>>> {
        let vault = self.load()?;

        let mut result = BTreeMap::new();
        for (site, entries) in vault.sites() {
            let decrypted = entries
                .iter()
                .map(|entry| self.decrypt_entry(entry, ctx).ok())
                .collect();
            result.insert(site.clone(), decrypted);
        }
        Ok(result)
    }

    /// All stored site names.  No decryption, no master password.
    pub fn list_site_names(&self) -> Result<Vec<String>> {
        Ok(self.load()?.sites().keys().cloned().collect())
    }

    /// Site names for display, disambiguating multi-entry sites by
    /// appending each entry's username to the label.
    pub fn site_display_names(&self, ctx: &Unlocked) -> Result<Vec<SiteDisplayItem>> {
        let vault = self.load()?;

        let mut items = Vec::new();
        for (site, entries) in vault.sites() {
            if entries.len() == 1 {
                items.push(SiteDisplayItem {
                    label: site.clone(),
                    site: site.clone(),
                    username: None,
                });
                continue;
            }

            for entry in entries {
                let username = ctx
                    .key()
                    .open_str(&entry.username)
                    .unwrap_or_else(|_| UNDECRYPTABLE.to_string());
                items.push(SiteDisplayItem {
                    label: format!("{site} | {username}"),
                    site: site.clone(),
                    username: Some(username),
                });
            }
        }
        Ok(items)
    }

    fn decrypt_entry(&self, entry: &CredentialEntry, ctx: &Unlocked) -> Result<Credential> {
        Ok(Credential {
            username: ctx.key().open_str(&entry.username)?,
            password: ctx.key().open_str(&entry.password)?,
        })
    }
}

/// Validate a site name: non-empty after trimming.
///
/// Site names are user-chosen and case-sensitive; no further shape is
/// imposed on them.
fn validate_site(site: &str) -> Result<()> {
    if site.trim().is_empty() {
        return Err(PassVaultError::InvalidInput(
            "site name cannot be empty".into(),
        ));
    }
    Ok(())
}
