//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - On-disk locations and atomic/transactional file writes (`paths`)
//! - The per-vault salt (`salt`)
//! - Persisted record types and legacy-format normalization (`record`)
//! - Master-password verification and lockout (`gate`)
//! - Credential CRUD (`store`)
//! - Password rotation and full wipe (`admin`)

pub mod admin;
pub mod gate;
pub mod paths;
pub mod record;
pub mod salt;
pub mod store;

// Re-export the most commonly used items.
pub use admin::{RotationReport, VaultAdmin};
pub use gate::{Unlocked, UnlockGate};
pub use paths::VaultPaths;
pub use record::{CredentialEntry, VaultConfig, VaultFile};
pub use salt::SaltStore;
pub use store::{Credential, CredentialStore, SiteDisplayItem};
