use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Input validation ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Authentication failed — wrong key or corrupted token")]
    AuthenticationFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Unlock gate errors ---
    #[error("Wrong master password")]
    WrongPassword,

    #[error("Too many failed attempts — locked for {0} more second(s)")]
    LockedOut(u64),

    #[error("No master password set — run `passvault init` first")]
    NoMasterPassword,

    #[error("A master password is already set for this vault")]
    MasterPasswordAlreadySet,

    #[error("Existing credentials would become unreadable — wipe declined")]
    WipeDeclined,

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    // --- Store errors ---
    #[error("Site '{0}' not found")]
    NotFound(String),

    #[error("Decryption failed for one or more entries under '{0}'")]
    DecryptionFailed(String),

    #[error("Vault file corrupted: {0}")]
    StoreCorrupted(PathBuf),

    // --- Legacy key errors ---
    #[error("Legacy key error: {0}")]
    LegacyKeyError(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
