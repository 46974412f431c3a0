//! On-disk locations and crash-safe file writes.
//!
//! Every persisted record lives under a single data directory:
//!
//! ```text
//! <data_dir>/salt.bin               16-byte KDF salt
//! <data_dir>/config.json            unlock token record
//! <data_dir>/passwords.json         encrypted credential store
//! <data_dir>/passwords_backup.json  backup of a corrupted store
//! <data_dir>/secret.key             legacy raw key (migration only)
//! ```
//!
//! All writes go through `write_atomic` (temp file + rename) so readers
//! never see a half-written file.  Operations that must replace several
//! files in one logical step use `FileTxn`: stage everything first, then
//! commit all the renames back to back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Resolved paths for one vault instance.
#[derive(Debug, Clone)]
pub struct VaultPaths {
    data_dir: PathBuf,
}

impl VaultPaths {
    /// Create paths rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The vault data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        Ok(())
    }

    /// Path of the raw 16-byte salt.
    pub fn salt(&self) -> PathBuf {
        self.data_dir.join("salt.bin")
    }

    /// Path of the config record holding the unlock token.
    pub fn config(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }

    /// Path of the encrypted credential store.
    pub fn passwords(&self) -> PathBuf {
        self.data_dir.join("passwords.json")
    }

    /// Backup path a corrupted store is moved to.
    pub fn passwords_backup(&self) -> PathBuf {
        self.data_dir.join("passwords_backup.json")
    }

    /// Path of the legacy raw key file.
    pub fn legacy_key(&self) -> PathBuf {
        self.data_dir.join("secret.key")
    }
}

/// Temp-file sibling used while staging a write to `path`.
fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Write `bytes` to `path` atomically.
///
/// Writes to a temp file in the same directory, then renames it over the
/// target.  Same-directory rename is atomic on the same filesystem.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = temp_path(path);
    fs::write(&tmp, bytes)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// A staged multi-file replacement.
///
/// `stage` writes each new file to a temp sibling; `commit` renames them
/// all over their targets in staging order.  If the transaction is
/// dropped without committing, the temp files are removed and every
/// target is left byte-for-byte unchanged.
pub struct FileTxn {
    staged: Vec<(PathBuf, PathBuf)>,
    committed: bool,
}

impl FileTxn {
    pub fn new() -> Self {
        Self {
            staged: Vec::new(),
            committed: false,
        }
    }

    /// Stage `bytes` as the new content of `target`.
    pub fn stage(&mut self, target: &Path, bytes: &[u8]) -> Result<()> {
        let tmp = temp_path(target);
        fs::write(&tmp, bytes)?;
        self.staged.push((tmp, target.to_path_buf()));
        Ok(())
    }

    /// Rename every staged file over its target.
    pub fn commit(mut self) -> Result<()> {
        for (tmp, target) in self.staged.drain(..) {
            fs::rename(&tmp, &target)?;
        }
        self.committed = true;
        Ok(())
    }
}

impl Default for FileTxn {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FileTxn {
    fn drop(&mut self) {
        if !self.committed {
            for (tmp, _) in &self.staged {
                let _ = fs::remove_file(tmp);
            }
        }
    }
}
