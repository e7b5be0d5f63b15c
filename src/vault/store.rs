//! High-level vault operations used by CLI commands.
//!
//! `VaultStore` owns the vault directory: discovery (`all`, `default_vault`,
//! `first`, `exact`) and the lifecycle operations (`create`, `delete`,
//! `rename`, `change_password`, `export`).  Every mutating operation holds
//! the vault's exclusive lock for its whole duration; `export` holds the
//! shared lock.

use std::fs;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

use super::handle::Vault;
use super::lock::VaultLock;
use super::name::{parse_file_name, validate_name, validate_password, BACKUP_SUFFIX, LOCK_SUFFIX};
use super::unlocked::UnlockedVault;
use crate::config::Settings;
use crate::crypto::generate_salt;
use crate::errors::{MrsError, Result};

/// Handle on the vault directory.
pub struct VaultStore<'a> {
    settings: &'a Settings,
}

impl<'a> VaultStore<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Directory holding the vault files.
    pub fn dir(&self) -> &Path {
        &self.settings.vault_dir
    }

    // ------------------------------------------------------------------
    // Discovery
    // ------------------------------------------------------------------

    /// Every vault in the vault directory, sorted by file name.
    ///
    /// Backups, lock files, temp files and anything else that is not a
    /// well-formed vault file are skipped.
    pub fn all(&self) -> Result<Vec<Vault>> {
        self.find("")
    }

    /// The default vault.
    ///
    /// With a configured default name, exactly one vault of that name must
    /// exist.  Without one, the first vault is returned, or `None` when the
    /// directory is empty.
    pub fn default_vault(&self) -> Result<Option<Vault>> {
        let Some(name) = self.settings.default_vault.as_deref() else {
            return Ok(self.all()?.into_iter().next());
        };

        let mut matches: Vec<Vault> = self
            .find(name)?
            .into_iter()
            .filter(|v| v.name() == name)
            .collect();
        match matches.len() {
            0 => Err(MrsError::VaultNotFound(name.to_string())),
            1 => Ok(matches.pop()),
            count => Err(MrsError::AmbiguousVault {
                name: name.to_string(),
                count,
            }),
        }
    }

    /// The first vault whose name starts with `prefix`.
    pub fn first(&self, prefix: &str) -> Result<Vault> {
        if prefix.is_empty() {
            return Err(MrsError::InvalidVaultName(String::new()));
        }
        self.find(prefix)?
            .into_iter()
            .next()
            .ok_or_else(|| MrsError::VaultNotFound(prefix.to_string()))
    }

    /// Like `first`, but the vault's name must equal `name` exactly.
    ///
    /// Guards destructive operations against prefix collisions.
    pub fn exact(&self, name: &str) -> Result<Vault> {
        let vaults = self.find(name)?;
        if let Some(vault) = vaults.iter().find(|v| v.name() == name) {
            return Ok(vault.clone());
        }
        match vaults.into_iter().next() {
            Some(other) => Err(MrsError::VaultNameMismatch {
                name: name.to_string(),
                suggestion: other.name().to_string(),
            }),
            None => Err(MrsError::VaultNotFound(name.to_string())),
        }
    }

    /// Look `vault` up again by name.
    ///
    /// Called once its lock is held: another process may have migrated or
    /// removed the file while this one waited.
    pub fn reload(&self, vault: &Vault) -> Result<Vault> {
        self.exact(vault.name())
    }

    /// Vaults whose name starts with `prefix` (all vaults for "").
    fn find(&self, prefix: &str) -> Result<Vec<Vault>> {
        if !prefix.is_empty() {
            validate_name(prefix)?;
        }

        let dir = self.dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let Ok(file_name) = entry.file_name().into_string() else {
                continue;
            };
            if !file_name.starts_with(prefix)
                || file_name.ends_with(BACKUP_SUFFIX)
                || file_name.ends_with(LOCK_SUFFIX)
            {
                continue;
            }
            if !entry.file_type()?.is_file() {
                continue;
            }
            candidates.push((file_name, entry.path()));
        }
        candidates.sort();

        let vaults = candidates
            .into_iter()
            .filter_map(|(file_name, path)| {
                let parsed = parse_file_name(&file_name).ok()?;
                match Vault::from_parts(path, parsed) {
                    Ok(vault) => Some(vault),
                    Err(e) => {
                        tracing::debug!(file = %file_name, "skipping malformed vault file: {e}");
                        None
                    }
                }
            })
            .collect();
        Ok(vaults)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Create a vault, optionally seeded with the plaintext in `import_file`.
    pub fn create(
        &self,
        name: &str,
        password: Zeroizing<Vec<u8>>,
        import_file: Option<&Path>,
    ) -> Result<UnlockedVault> {
        validate_name(name)?;
        validate_password(&password)?;

        let dir = self.settings.ensure_vault_dir()?;
        let _lock = VaultLock::exclusive(dir, name)?;

        // A legacy vault (no salt) of the same name blocks creation, and
        // so does any salted one.
        let legacy = Vault::legacy(dir, name)?;
        if crate::fs::path_exists(legacy.path())?
            || self.find(name)?.iter().any(|v| v.name() == name)
        {
            return Err(MrsError::VaultAlreadyExists(name.to_string()));
        }

        let salt = generate_salt()?;
        let vault = Vault::salted(dir, name, &salt)?;
        if crate::fs::path_exists(vault.path())? {
            return Err(MrsError::VaultAlreadyExists(name.to_string()));
        }

        let content = match import_file {
            Some(path) => Zeroizing::new(fs::read_to_string(path).map_err(|source| {
                MrsError::ImportFailed {
                    path: path.to_path_buf(),
                    source,
                }
            })?),
            None => Zeroizing::new(String::new()),
        };

        let mut unlocked = vault.unlocked(password);
        unlocked.write(&content)?;
        tracing::debug!(vault = %unlocked, "created vault");
        Ok(unlocked)
    }

    /// Delete the vault named exactly `name`, and its backup.
    pub fn delete(&self, name: &str) -> Result<()> {
        let vault = self.exact(name)?;
        let _lock = VaultLock::exclusive(self.dir(), vault.name())?;
        let vault = self.reload(&vault)?;

        fs::remove_file(vault.path())?;
        let backup = vault.backup_path();
        if backup.exists() {
            if let Err(e) = fs::remove_file(&backup) {
                tracing::warn!("could not remove backup {}: {e}", backup.display());
            }
        }
        Ok(())
    }

    /// Rename vault `source` to `target`, keeping its salt.
    ///
    /// Both names are locked, in name order, so two opposite renames
    /// serialize instead of each holding one lock.  Conflicts are checked
    /// once before locking and again under the locks.
    pub fn rename(&self, source: &str, target: &str) -> Result<Vault> {
        if source == target {
            return Err(MrsError::SameVaultName(source.to_string()));
        }
        validate_name(target)?;

        self.rename_target(&self.exact(source)?, target)?;

        let (first, second) = if source < target {
            (source, target)
        } else {
            (target, source)
        };
        let _first_lock = VaultLock::exclusive(self.dir(), first)?;
        let _second_lock = VaultLock::exclusive(self.dir(), second)?;

        let source_vault = self.exact(source)?;
        let target_vault = self.rename_target(&source_vault, target)?;

        fs::rename(source_vault.path(), target_vault.path())?;

        let backup = source_vault.backup_path();
        if backup.exists() {
            if let Err(e) = fs::rename(&backup, target_vault.backup_path()) {
                tracing::warn!("could not rename backup {}: {e}", backup.display());
            }
        }
        Ok(target_vault)
    }

    /// Where `source` would live under the name `target`, or the conflict
    /// that prevents the rename.
    fn rename_target(&self, source: &Vault, target: &str) -> Result<Vault> {
        if self.find(target)?.iter().any(|v| v.name() == target) {
            return Err(MrsError::VaultAlreadyExists(target.to_string()));
        }

        // Legacy vaults do not have a per-vault salt.
        let target_vault = match source.salt() {
            Some(salt) => Vault::salted(self.dir(), target, salt)?,
            None => Vault::legacy(self.dir(), target)?,
        };
        if crate::fs::path_exists(target_vault.path())? {
            return Err(MrsError::TargetPathExists(target_vault.path().to_path_buf()));
        }
        Ok(target_vault)
    }

    /// Re-encrypt the first vault matching `prefix` under a new password.
    pub fn change_password(
        &self,
        prefix: &str,
        old_password: Zeroizing<Vec<u8>>,
        new_password: Zeroizing<Vec<u8>>,
    ) -> Result<UnlockedVault> {
        validate_password(&new_password)?;

        let vault = self.first(prefix)?;
        let _lock = VaultLock::exclusive(self.dir(), vault.name())?;
        let vault = self.reload(&vault)?;

        let mut unlocked = vault.unlocked(old_password);
        unlocked.change_password(new_password)?;
        Ok(unlocked)
    }

    /// Decrypt the vault named exactly `name` and return its plaintext.
    ///
    /// The caller decides where the plaintext goes.
    pub fn export(&self, name: &str, password: Zeroizing<Vec<u8>>) -> Result<Zeroizing<String>> {
        let vault = self.exact(name)?;
        let _lock = VaultLock::shared(self.dir(), vault.name())?;
        self.reload(&vault)?.unlocked(password).read()
    }

    /// Take the exclusive lock for `vault` and return it with the vault
    /// as it is on disk once the lock is held.  Used by add and edit.
    pub fn lock_exclusive(&self, vault: &Vault) -> Result<(Vault, VaultLock)> {
        let lock = VaultLock::exclusive(self.dir(), vault.name())?;
        Ok((self.reload(vault)?, lock))
    }

    /// Shared-lock counterpart of `lock_exclusive`.  Used by search.
    pub fn lock_shared(&self, vault: &Vault) -> Result<(Vault, VaultLock)> {
        let lock = VaultLock::shared(self.dir(), vault.name())?;
        Ok((self.reload(vault)?, lock))
    }
}
