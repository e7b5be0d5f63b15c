//! Cross-process vault locks.
//!
//! Each vault name gets a sibling lock file `<vault_dir>/<name>.lock`.
//! Locking by name rather than by vault path keeps the lock stable while
//! a legacy vault is renamed to its salted file name.
//!
//! Acquisition blocks until the lock is granted.  The lock is released
//! when the guard is dropped, on every exit path.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs4::fs_std::FileExt;

use super::name::{validate_name, LOCK_SUFFIX};
use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Many readers, no writer.
    Shared,
    /// One writer, no readers.
    Exclusive,
}

/// An acquired vault lock.
#[derive(Debug)]
pub struct VaultLock {
    file: File,
    path: PathBuf,
    mode: LockMode,
}

impl VaultLock {
    /// Block until an exclusive lock on vault `name` is held.
    pub fn exclusive(vault_dir: &Path, name: &str) -> Result<Self> {
        Self::acquire(vault_dir, name, LockMode::Exclusive)
    }

    /// Block until a shared lock on vault `name` is held.
    pub fn shared(vault_dir: &Path, name: &str) -> Result<Self> {
        Self::acquire(vault_dir, name, LockMode::Shared)
    }

    /// Take an exclusive lock on vault `name` if it is free right now.
    pub fn try_exclusive(vault_dir: &Path, name: &str) -> Result<Option<Self>> {
        Self::try_acquire(vault_dir, name, LockMode::Exclusive)
    }

    /// Take a shared lock on vault `name` unless a writer holds it.
    pub fn try_shared(vault_dir: &Path, name: &str) -> Result<Option<Self>> {
        Self::try_acquire(vault_dir, name, LockMode::Shared)
    }

    fn acquire(vault_dir: &Path, name: &str, mode: LockMode) -> Result<Self> {
        let (file, path) = open_lock_file(vault_dir, name)?;
        match mode {
            LockMode::Shared => FileExt::lock_shared(&file)?,
            LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
        }
        tracing::debug!(lock = %path.display(), ?mode, "acquired vault lock");

        Ok(Self { file, path, mode })
    }

    fn try_acquire(vault_dir: &Path, name: &str, mode: LockMode) -> Result<Option<Self>> {
        let (file, path) = open_lock_file(vault_dir, name)?;
        let acquired = match mode {
            LockMode::Shared => FileExt::try_lock_shared(&file)?,
            LockMode::Exclusive => FileExt::try_lock_exclusive(&file)?,
        };
        if !acquired {
            return Ok(None);
        }
        tracing::debug!(lock = %path.display(), ?mode, "acquired vault lock");

        Ok(Some(Self { file, path, mode }))
    }

    pub fn mode(&self) -> LockMode {
        self.mode
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_lock_file(vault_dir: &Path, name: &str) -> Result<(File, PathBuf)> {
    validate_name(name)?;
    let path = vault_dir.join(format!("{name}{LOCK_SUFFIX}"));

    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options.open(&path)?;
    Ok((file, path))
}

impl Drop for VaultLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(lock = %self.path.display(), "failed to release vault lock: {e}");
        }
    }
}
