//! Vault naming rules.
//!
//! A vault file's base name is `<name>[.<salt>][.bak]`.  Names cannot
//! contain ".", because it separates the name from the salt.  Rejecting
//! everything outside `[A-Za-z0-9_-]` also rules out hidden files,
//! `../` traversal and names with file extensions.
//!
//! Everything here is a pure function over strings, except
//! `validate_path`, which looks at the filesystem.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::errors::{MrsError, Result};

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Suffix marking the pre-overwrite copy of a vault.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Suffix of the per-vault lock files kept next to the vaults.
pub const LOCK_SUFFIX: &str = ".lock";

fn name_regex() -> &'static Regex {
    static NAME: OnceLock<Regex> = OnceLock::new();
    NAME.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex is valid"))
}

/// A parsed vault file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultFileName {
    pub name: String,
    pub salt: Option<String>,
    pub backup: bool,
}

/// Check that `name` is a usable vault name.
pub fn validate_name(name: &str) -> Result<()> {
    if !name_regex().is_match(name) {
        return Err(MrsError::InvalidVaultName(name.to_string()));
    }
    Ok(())
}

/// Check that a password is long enough.
pub fn validate_password(password: &[u8]) -> Result<()> {
    let chars = String::from_utf8_lossy(password).chars().count();
    if chars < MIN_PASSWORD_LEN {
        return Err(MrsError::InvalidPassword(MIN_PASSWORD_LEN));
    }
    Ok(())
}

/// Split a base name into name, optional salt and backup marker.
pub fn parse_file_name(base: &str) -> Result<VaultFileName> {
    let (name, rest) = match base.split_once('.') {
        Some((name, rest)) => (name, Some(rest)),
        None => (base, None),
    };
    validate_name(name)?;

    let Some(rest) = rest else {
        return Ok(VaultFileName {
            name: name.to_string(),
            salt: None,
            backup: false,
        });
    };

    let (salt, backup) = match rest.strip_suffix(BACKUP_SUFFIX) {
        Some(salt) => (salt, true),
        None => (rest, false),
    };
    validate_name(salt).map_err(|_| MrsError::InvalidVaultName(base.to_string()))?;

    Ok(VaultFileName {
        name: name.to_string(),
        salt: Some(salt.to_string()),
        backup,
    })
}

/// Check that `path` names an existing regular file with a valid vault
/// file name.
pub fn validate_path(path: &Path) -> Result<VaultFileName> {
    let invalid = |reason: String| MrsError::InvalidVaultPath {
        path: path.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(path).map_err(|e| invalid(e.to_string()))?;
    if metadata.is_dir() {
        return Err(invalid("should be a file, but is a directory".into()));
    }
    if !metadata.is_file() {
        return Err(invalid("not a regular file".into()));
    }

    let base = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| invalid("file name is not valid UTF-8".into()))?;
    parse_file_name(base)
}
