//! `UnlockedVault`: a vault plus its password.
//!
//! Owns every operation that needs the password: read, write, legacy
//! migration and password change.  The password is held in a
//! `Zeroizing` buffer, so it is wiped on drop whatever path the caller
//! leaves by; `wipe` does the same thing early.

use std::fs;

use zeroize::{Zeroize, Zeroizing};

use super::handle::Vault;
use crate::crypto;
use crate::errors::{MrsError, Result};

/// Salt shared by every vault written before per-vault salts existed.
pub const LEGACY_SALT: &str = "99daa49d-3a53-4bf8-a74a-93295de71d41-4bac-8cea";

/// A vault that can be read from and written to.
pub struct UnlockedVault {
    vault: Vault,
    password: Zeroizing<Vec<u8>>,
}

impl UnlockedVault {
    pub fn new(vault: Vault, password: Zeroizing<Vec<u8>>) -> Self {
        Self { vault, password }
    }

    /// The current handle.  Changes when a legacy vault is migrated.
    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    pub fn name(&self) -> &str {
        self.vault.name()
    }

    /// Decrypt the vault and return its plaintext.
    pub fn read(&self) -> Result<Zeroizing<String>> {
        let ciphertext = fs::read(self.vault.path())?;

        let salt = match self.vault.salt() {
            Some(salt) => salt,
            None => {
                tracing::warn!(
                    "Vault \"{}\" uses a static salt. It will be automatically upgraded to \
                     using a unique salt the next time you edit it.",
                    self.vault
                );
                LEGACY_SALT
            }
        };

        let mut plaintext = crypto::decrypt(&ciphertext, &self.password, salt, self.name())?;
        let bytes = std::mem::take(&mut *plaintext);
        String::from_utf8(bytes).map(Zeroizing::new).map_err(|e| {
            let mut bad_bytes = e.into_bytes();
            bad_bytes.zeroize();
            MrsError::DecryptionFailed(self.name().to_string())
        })
    }

    /// Encrypt `plaintext` and write it to the vault.
    ///
    /// 1. Encrypt in memory (under a fresh salt for a legacy vault).
    /// 2. Legacy vaults only: write the ciphertext to `<name>.<salt>`,
    ///    then remove the legacy file.  No backup is made; the legacy file
    ///    stays in place until the salted file is committed.
    /// 3. Otherwise copy the current file to `<file>.bak` (best-effort)
    ///    and replace the file atomically.
    ///
    /// Returns the handle after the write, which differs from the one
    /// before it when the vault was migrated.  On error the last committed
    /// file is left as it was.
    pub fn write(&mut self, plaintext: &str) -> Result<&Vault> {
        if self.vault.is_backup() {
            return Err(MrsError::ReadOnlyBackup(self.vault.path().display().to_string()));
        }

        let target = match self.vault.salt() {
            Some(_) => self.vault.clone(),
            None => self.vault.with_salt(&crypto::generate_salt()?)?,
        };
        self.write_to(target, plaintext)
    }

    fn write_to(&mut self, target: Vault, plaintext: &str) -> Result<&Vault> {
        let Some(salt) = target.salt() else {
            return Err(MrsError::EncryptionFailed(format!(
                "vault {} has no salt",
                self.vault
            )));
        };

        let ciphertext = crypto::encrypt(plaintext.as_bytes(), &self.password, salt).map_err(
            |e| {
                MrsError::EncryptionFailed(format!(
                    "failed to encrypt secrets. Vault {} is unchanged: {e}",
                    self.vault
                ))
            },
        )?;

        if self.vault.is_legacy() {
            self.migrate_to(target, &ciphertext)?;
            return Ok(&self.vault);
        }

        let path = self.vault.path();
        if crate::fs::path_exists(path)? {
            let backup = self.vault.backup_path();
            if let Err(e) = crate::fs::copy_private(path, &backup) {
                tracing::warn!(
                    "could not back up vault {} to {}: {e}",
                    self.vault,
                    backup.display()
                );
            }
        }

        crate::fs::replace_atomically(path, &ciphertext)?;
        Ok(&self.vault)
    }

    /// Commit `ciphertext` under the salted name, then drop the legacy
    /// file and adopt the new handle.  One-way: a salted vault is never
    /// renamed back.
    fn migrate_to(&mut self, target: Vault, ciphertext: &[u8]) -> Result<()> {
        if crate::fs::path_exists(target.path())? {
            return Err(MrsError::TargetPathExists(target.path().to_path_buf()));
        }
        crate::fs::replace_atomically(target.path(), ciphertext)?;

        let legacy = std::mem::replace(&mut self.vault, target);
        tracing::info!(
            "Migrating legacy vault {} to include a unique salt: {}",
            self.vault,
            self.vault.salt().unwrap_or_default()
        );

        // Left in place, the legacy file would shadow the salted one.
        if crate::fs::path_exists(legacy.path())? {
            fs::remove_file(legacy.path()).map_err(|e| {
                MrsError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "vault {} was migrated but {} could not be removed: {e}",
                        self.vault,
                        legacy.path().display()
                    ),
                ))
            })?;
        }
        Ok(())
    }

    /// Re-encrypt the vault under `new_password`.
    ///
    /// Reads under the current password first, so a wrong current password
    /// fails before anything is written.
    pub fn change_password(&mut self, new_password: Zeroizing<Vec<u8>>) -> Result<&Vault> {
        let plaintext = self.read()?;
        self.password = new_password;
        self.write(&plaintext)
    }

    /// Zero the password now.  Dropping the vault does the same.
    pub fn wipe(&mut self) {
        self.password.zeroize();
    }

    #[cfg(test)]
    pub(crate) fn password_bytes(&self) -> &[u8] {
        &self.password
    }
}

impl std::fmt::Display for UnlockedVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.vault, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{encrypt_with_iterations, LEGACY_ITERATIONS, MIN_SALT_LEN};
    use std::path::Path;
    use tempfile::TempDir;

    const SALT: &str = "12345678901234567890123456789012";

    fn password(p: &str) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(p.as_bytes().to_vec())
    }

    fn unlocked(dir: &Path, base: &str, p: &str) -> UnlockedVault {
        Vault::from_path(dir.join(base)).unwrap().unlocked(password(p))
    }

    #[test]
    fn write_then_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        v.write("GitHub\ntoken123").unwrap();
        assert_eq!(v.read().unwrap().as_str(), "GitHub\ntoken123");
    }

    #[test]
    fn first_write_makes_no_backup_second_write_does() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        let bak = v.vault().backup_path();

        v.write("first content").unwrap();
        assert!(!bak.exists(), "backup file should not exist after first write");

        v.write("second content").unwrap();
        assert!(bak.exists(), "backup file should exist after second write");

        let backup = Vault::from_path(&bak).unwrap().unlocked(password("password"));
        assert_eq!(backup.read().unwrap().as_str(), "first content");
        assert_eq!(v.read().unwrap().as_str(), "second content");
    }

    #[test]
    fn backup_handles_are_read_only() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}.bak"), "password");
        assert!(matches!(v.write("x"), Err(MrsError::ReadOnlyBackup(_))));
    }

    #[test]
    fn wrong_password_fails_generically() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        v.write("content").unwrap();

        let wrong = unlocked(tmp.path(), &format!("test.{SALT}"), "wrong-password");
        let err = wrong.read().unwrap_err();
        assert!(matches!(err, MrsError::DecryptionFailed(ref name) if name == "test"));
        assert_eq!(err.to_string(), "failed to decrypt vault test");
    }

    #[test]
    fn tampered_ciphertext_fails() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        v.write("content").unwrap();

        let mut bytes = fs::read(v.vault().path()).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        fs::write(v.vault().path(), bytes).unwrap();

        assert!(matches!(v.read(), Err(MrsError::DecryptionFailed(_))));
    }

    #[test]
    fn legacy_vault_is_read_and_migrated_on_write() {
        let tmp = TempDir::new().unwrap();
        let legacy_path = tmp.path().join("old");
        let ciphertext =
            encrypt_with_iterations(b"A\n1\n", b"password", LEGACY_SALT, LEGACY_ITERATIONS)
                .unwrap();
        fs::write(&legacy_path, ciphertext).unwrap();

        let mut v = unlocked(tmp.path(), "old", "password");
        assert!(v.vault().is_legacy());
        assert_eq!(v.read().unwrap().as_str(), "A\n1\n");

        let migrated = v.write("A\n2\n").unwrap().clone();
        assert!(!migrated.is_legacy());
        assert!(!migrated.backup_path().exists());
        assert_eq!(migrated.name(), "old");
        assert!(migrated.salt().unwrap().len() >= MIN_SALT_LEN);
        assert!(!legacy_path.exists());
        assert!(migrated.path().exists());

        let reopened = migrated.clone().unlocked(password("password"));
        assert_eq!(reopened.read().unwrap().as_str(), "A\n2\n");

        // Salted is terminal: another write keeps the same file name.
        v.write("A\n3\n").unwrap();
        assert_eq!(v.vault(), &migrated);
    }

    fn write_legacy(dir: &Path, base: &str, content: &[u8]) -> Vec<u8> {
        let ciphertext =
            encrypt_with_iterations(content, b"password", LEGACY_SALT, LEGACY_ITERATIONS).unwrap();
        fs::write(dir.join(base), &ciphertext).unwrap();
        ciphertext
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn failed_migration_leaves_legacy_vault_readable() {
        let tmp = TempDir::new().unwrap();
        let before = write_legacy(tmp.path(), "old", b"A\n1\n");
        let mut v = unlocked(tmp.path(), "old", "password");

        // A directory where the temp file should go makes the replace fail.
        let blocker = tmp.path().join(format!(".old.{SALT}.tmp"));
        fs::create_dir(&blocker).unwrap();

        let target = v.vault().with_salt(SALT).unwrap();
        assert!(v.write_to(target, "A\n2\n").is_err());

        assert!(v.vault().is_legacy());
        assert_eq!(fs::read(tmp.path().join("old")).unwrap(), before);
        assert_eq!(file_names(tmp.path()), [format!(".old.{SALT}.tmp"), "old".to_string()]);
        assert_eq!(v.read().unwrap().as_str(), "A\n1\n");

        // Once the obstacle is gone the migration goes through.
        fs::remove_dir(&blocker).unwrap();
        let target = v.vault().with_salt(SALT).unwrap();
        v.write_to(target, "A\n2\n").unwrap();
        assert_eq!(file_names(tmp.path()), [format!("old.{SALT}")]);
        assert_eq!(v.read().unwrap().as_str(), "A\n2\n");
    }

    #[test]
    fn migration_refuses_to_overwrite_existing_salted_file() {
        let tmp = TempDir::new().unwrap();
        write_legacy(tmp.path(), "old", b"A\n1\n");
        fs::write(tmp.path().join(format!("old.{SALT}")), b"other").unwrap();
        let mut v = unlocked(tmp.path(), "old", "password");

        let target = v.vault().with_salt(SALT).unwrap();
        assert!(matches!(
            v.write_to(target, "A\n2\n"),
            Err(MrsError::TargetPathExists(_))
        ));
        assert_eq!(fs::read(tmp.path().join(format!("old.{SALT}"))).unwrap(), b"other");
        assert_eq!(v.read().unwrap().as_str(), "A\n1\n");
    }

    #[test]
    fn failed_write_leaves_committed_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        v.write("first").unwrap();
        let before = fs::read(v.vault().path()).unwrap();

        fs::create_dir(tmp.path().join(format!(".test.{SALT}.tmp"))).unwrap();
        assert!(v.write("second").is_err());

        assert_eq!(fs::read(v.vault().path()).unwrap(), before);
        assert_eq!(v.read().unwrap().as_str(), "first");
    }

    #[test]
    fn backup_failure_does_not_fail_the_write() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        v.write("first").unwrap();

        // The backup cannot be written over a directory.
        let bak = v.vault().backup_path();
        fs::create_dir(&bak).unwrap();

        v.write("second").unwrap();
        assert_eq!(v.read().unwrap().as_str(), "second");
        assert!(bak.is_dir());
    }

    #[test]
    fn change_password_reencrypts() {
        let tmp = TempDir::new().unwrap();
        let base = format!("test.{SALT}");
        let mut v = unlocked(tmp.path(), &base, "old-password");
        v.write("secret").unwrap();

        v.change_password(password("new-password")).unwrap();

        let old = unlocked(tmp.path(), &base, "old-password");
        assert!(old.read().is_err());
        let new = unlocked(tmp.path(), &base, "new-password");
        assert_eq!(new.read().unwrap().as_str(), "secret");
    }

    #[test]
    fn change_password_with_wrong_current_password_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let base = format!("test.{SALT}");
        let mut v = unlocked(tmp.path(), &base, "password");
        v.write("secret").unwrap();
        let before = fs::read(v.vault().path()).unwrap();

        let mut wrong = unlocked(tmp.path(), &base, "not-the-password");
        assert!(wrong.change_password(password("new-password")).is_err());
        assert_eq!(fs::read(v.vault().path()).unwrap(), before);
    }

    #[test]
    fn wipe_zeroes_password() {
        let tmp = TempDir::new().unwrap();
        let mut v = unlocked(tmp.path(), &format!("test.{SALT}"), "password");
        v.wipe();
        assert!(v.password_bytes().iter().all(|b| *b == 0));
    }
}
