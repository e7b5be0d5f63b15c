use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in mrs.
#[derive(Debug, Error)]
pub enum MrsError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Never says whether the password or the ciphertext was at fault.
    #[error("failed to decrypt vault {0}")]
    DecryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Salt must be at least {min} characters in length, but was {actual}")]
    InvalidSalt { min: usize, actual: usize },

    // --- Validation errors ---
    #[error("invalid vault name \"{0}\"")]
    InvalidVaultName(String),

    #[error("password must contain at least {0} characters")]
    InvalidPassword(usize),

    #[error("invalid vault path \"{path}\": {reason}")]
    InvalidVaultPath { path: PathBuf, reason: String },

    #[error("invalid regular expression \"{pattern}\": {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // --- Vault errors ---
    #[error("vault \"{0}\" not found. run `mrs vault create` to create one")]
    VaultNotFound(String),

    #[error("vault named \"{name}\" not found. Did you mean \"{suggestion}\"?")]
    VaultNameMismatch { name: String, suggestion: String },

    #[error("No vaults found. run `mrs vault create` to create one")]
    NoVaults,

    #[error("a vault named \"{0}\" already exists")]
    VaultAlreadyExists(String),

    #[error("the target path \"{0}\" already exists")]
    TargetPathExists(PathBuf),

    #[error("the source and target vault names cannot both be \"{0}\"")]
    SameVaultName(String),

    #[error("{count} vaults are named \"{name}\"; remove the extras before using it as the default")]
    AmbiguousVault { name: String, count: usize },

    #[error("vault {0} is a backup copy and cannot be written to")]
    ReadOnlyBackup(String),

    #[error("could not read from import file at {path}: {source}")]
    ImportFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    // --- Config errors ---
    #[error("Config error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Editor error: {0}")]
    EditorError(String),

    #[error("cancelled")]
    UserCancelled,

    #[error("password mismatch")]
    PasswordMismatch,
}

/// Convenience type alias for mrs results.
pub type Result<T> = std::result::Result<T, MrsError>;
