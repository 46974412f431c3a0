//! Persisted record types and legacy-format normalization.
//!
//! `passwords.json` maps a site name to a list of credential entries:
//!
//! ```json
//! { "example.com": [ { "username": "<token>", "password": "<token>" } ] }
//! ```
//!
//! Two legacy shapes are accepted on read and rewritten in the current
//! form on the next save: a single entry object directly under the site
//! (instead of a list), and the old `"user"` field name.  In memory
//! there is exactly one canonical form — site name to entry list.
//!
//! `config.json` is the small record holding the unlock token.  Fields
//! other than `hello` belong to external collaborators and are carried
//! through rewrites untouched.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::crypto::Token;
use crate::errors::{PassVaultError, Result};
use crate::vault::paths::write_atomic;

// ---------------------------------------------------------------------------
// CredentialEntry
// ---------------------------------------------------------------------------

/// One stored credential: both fields are independently encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialEntry {
    /// Encrypted username.  Legacy records used the field name `user`.
    #[serde(alias = "user")]
    pub username: Token,

    /// Encrypted password.
    pub password: Token,
}

/// The two on-disk shapes a site's value can take.
///
/// Normalized into a plain entry list as soon as the file is read;
/// saving always writes the list form.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSite {
    EntryList(Vec<CredentialEntry>),
    LegacyEntry(CredentialEntry),
}

impl StoredSite {
    fn into_entries(self) -> Vec<CredentialEntry> {
        match self {
            StoredSite::EntryList(entries) => entries,
            StoredSite::LegacyEntry(entry) => vec![entry],
        }
    }
}

// ---------------------------------------------------------------------------
// VaultFile
// ---------------------------------------------------------------------------

/// The in-memory credential store: site name → ordered entry list.
#[derive(Debug, Default)]
pub struct VaultFile {
    sites: BTreeMap<String, Vec<CredentialEntry>>,
}

impl VaultFile {
    /// Load the store from `path`, normalizing legacy shapes.
    ///
    /// A missing file is an empty store.  A malformed file is renamed to
    /// `backup_path` and treated as empty — never fatal, and the broken
    /// bytes are preserved for manual recovery.
    pub fn load(path: &Path, backup_path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)?;

        match serde_json::from_str::<BTreeMap<String, StoredSite>>(&data) {
            Ok(raw) => {
                let sites = raw
                    .into_iter()
                    .map(|(site, stored)| (site, stored.into_entries()))
                    .collect();
                Ok(Self { sites })
            }
            Err(_) => {
                fs::rename(path, backup_path)?;
                Ok(Self::default())
            }
        }
    }

    /// Serialize the store in the current (list) form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(&self.sites)
            .map_err(|e| PassVaultError::SerializationError(format!("store: {e}")))
    }

    /// Write the store to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_bytes()?)
    }

    /// Returns `true` if no sites are stored.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// All sites with their entry lists, in site-name order.
    pub fn sites(&self) -> &BTreeMap<String, Vec<CredentialEntry>> {
        &self.sites
    }

    /// The entry list for one site, if present.
    pub fn entries(&self, site: &str) -> Option<&Vec<CredentialEntry>> {
        self.sites.get(site)
    }

    /// Append an entry to a site's list, creating the site if absent.
    pub fn push_entry(&mut self, site: &str, entry: CredentialEntry) {
        self.sites.entry(site.to_string()).or_default().push(entry);
    }

    /// Replace a site's entry list.  An empty list removes the site.
    pub fn set_entries(&mut self, site: &str, entries: Vec<CredentialEntry>) {
        if entries.is_empty() {
            self.sites.remove(site);
        } else {
            self.sites.insert(site.to_string(), entries);
        }
    }

    /// Remove a site entirely.  Returns `true` if it existed.
    pub fn remove_site(&mut self, site: &str) -> bool {
        self.sites.remove(site).is_some()
    }
}

// ---------------------------------------------------------------------------
// VaultConfig
// ---------------------------------------------------------------------------

/// The config record.  `hello` absent means "no master password set".
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// The unlock token: the constant `"hello"` encrypted under the
    /// current master key.  Used only to test password correctness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hello: Option<Token>,

    /// Collaborator-owned keys (UI theme and the like), passed through.
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl VaultConfig {
    /// Load the config record; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data)
            .map_err(|e| PassVaultError::ConfigError(format!("failed to parse config: {e}")))
    }

    /// Serialize the config record.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| PassVaultError::SerializationError(format!("config: {e}")))
    }

    /// Write the config record to `path` atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_atomic(path, &self.to_bytes()?)
    }
}
