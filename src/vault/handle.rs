//! `Vault`: a value type identifying one vault file on disk.

use std::fmt;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use super::name::{parse_file_name, validate_name, VaultFileName, BACKUP_SUFFIX};
use super::unlocked::UnlockedVault;
use crate::crypto::MIN_SALT_LEN;
use crate::errors::{MrsError, Result};

/// A vault file, identified by its path.
///
/// A vault without a salt is a *legacy* vault: it was written with the
/// shared legacy salt and is migrated to its own salt on the next write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vault {
    name: String,
    path: PathBuf,
    salt: Option<String>,
    backup: bool,
}

impl Vault {
    /// Build a handle from a path, parsing name and salt from its base name.
    ///
    /// The file does not have to exist yet.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let base = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MrsError::InvalidVaultPath {
                path: path.clone(),
                reason: "missing or non UTF-8 file name".into(),
            })?;
        let parsed = parse_file_name(base)?;
        Self::from_parts(path, parsed)
    }

    /// Build the handle for `<dir>/<name>.<salt>`.
    pub fn salted(dir: &Path, name: &str, salt: &str) -> Result<Self> {
        Self::from_path(dir.join(format!("{name}.{salt}")))
    }

    /// Build the handle for the legacy file `<dir>/<name>`.
    pub fn legacy(dir: &Path, name: &str) -> Result<Self> {
        validate_name(name)?;
        Self::from_path(dir.join(name))
    }

    pub(crate) fn from_parts(path: PathBuf, parsed: VaultFileName) -> Result<Self> {
        if let Some(salt) = &parsed.salt {
            let actual = salt.chars().count();
            if actual < MIN_SALT_LEN {
                return Err(MrsError::InvalidSalt {
                    min: MIN_SALT_LEN,
                    actual,
                });
            }
        }
        Ok(Self {
            name: parsed.name,
            path,
            salt: parsed.salt,
            backup: parsed.backup,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The per-vault salt, or `None` for a legacy vault.
    pub fn salt(&self) -> Option<&str> {
        self.salt.as_deref()
    }

    pub fn is_legacy(&self) -> bool {
        self.salt.is_none()
    }

    /// Whether this handle points at a `.bak` copy.
    pub fn is_backup(&self) -> bool {
        self.backup
    }

    /// Directory that holds the vault file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Path of the backup written before this vault is overwritten.
    pub fn backup_path(&self) -> PathBuf {
        let mut os = self.path.clone().into_os_string();
        os.push(BACKUP_SUFFIX);
        PathBuf::from(os)
    }

    /// The same vault at a new salt; used by legacy migration.
    pub(crate) fn with_salt(&self, salt: &str) -> Result<Self> {
        Self::salted(self.dir(), &self.name, salt)
    }

    /// Attach a password, producing a handle that can read and write.
    pub fn unlocked(self, password: Zeroizing<Vec<u8>>) -> UnlockedVault {
        UnlockedVault::new(self, password)
    }
}

impl fmt::Display for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
