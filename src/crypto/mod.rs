//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM authenticated encryption as text-safe tokens (`cipher`)
//! - Argon2id password-based key derivation (`kdf`)
//! - The zeroize-on-drop `MasterKey` wrapper (`keys`)
//! - Legacy raw key file handling for one-time migration (`legacy`)

pub mod cipher;
pub mod kdf;
pub mod keys;
pub mod legacy;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, MasterKey, Token};
pub use cipher::Token;
pub use kdf::{derive_key, generate_salt, KEY_LEN, SALT_LEN};
pub use keys::MasterKey;
