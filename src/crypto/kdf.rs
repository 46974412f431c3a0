//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  The parameters are pinned: one salt and one work
//! factor for the vault's whole lifetime, so the same password always
//! reproduces the same key.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::TryRngCore;

use crate::errors::{PassVaultError, Result};

/// Length of the per-vault salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Fixed Argon2id memory cost in KiB (64 MB).
const MEMORY_KIB: u32 = 65_536;

/// Fixed Argon2id iteration count.
const ITERATIONS: u32 = 3;

/// Fixed Argon2id parallelism lanes.
const PARALLELISM: u32 = 4;

/// Derive a 32-byte key from a password and the per-vault salt.
///
/// Deterministic: the same password + salt always produce the same key.
/// Pure function — no I/O, no side effects.
pub fn derive_key(password: &str, salt: &[u8; SALT_LEN]) -> Result<[u8; KEY_LEN]> {
    if password.is_empty() {
        return Err(PassVaultError::InvalidInput(
            "master password cannot be empty".into(),
        ));
    }

    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(KEY_LEN))
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| {
            PassVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
        })?;

    Ok(key)
}

/// Generate a cryptographically random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    rand::rngs::OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("OS RNG failure: {e}")))?;
    Ok(salt)
}
