//! Filesystem helpers for files that hold secrets or ciphertext.
//!
//! Everything created here is owner-only: files `0600`, directories
//! `0700` (on Unix).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::errors::{MrsError, Result};

/// Returns `true` if `path` exists, `false` if it does not, and an error
/// if that cannot be determined (e.g. permission denied on the parent).
pub fn path_exists(path: &Path) -> Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(MrsError::Io(std::io::Error::new(
            e.kind(),
            format!("could not determine whether {} exists: {e}", path.display()),
        ))),
    }
}

/// Create `dir` and any missing parents with owner-only permissions.
pub fn create_private_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)?;
    }

    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;

    Ok(())
}

/// Open `path` for writing with owner-only permissions, truncating it.
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}

/// Write `bytes` to `path` with owner-only permissions.
pub fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = open_private(path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Copy `src` to `dst`; `dst` ends up owner-only.
pub fn copy_private(src: &Path, dst: &Path) -> Result<()> {
    let bytes = fs::read(src)?;
    write_private(dst, &bytes)
}

/// Replace `path` with `bytes` **atomically**.
///
/// The bytes go to a hidden temp file in the same directory, which is then
/// renamed over the target, so readers see either the old or the new
/// content and never a half-written file.
pub fn replace_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    if let Err(e) = write_private(&tmp_path, bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Overwrite a file's contents with zeros before deleting it.
///
/// Best-effort: failures are ignored, except that removal is always tried.
pub fn secure_delete(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let len = usize::try_from(metadata.len()).unwrap_or(0);
        if len > 0 {
            if let Ok(mut file) = fs::OpenOptions::new().write(true).open(path) {
                let _ = file.write_all(&vec![0u8; len]);
                let _ = file.sync_all();
            }
        }
    }
    let _ = fs::remove_file(path);
}

/// Scratch directories alive in this process, for `wipe_scratch_dirs`.
static LIVE_SCRATCH_DIRS: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

fn live_scratch_dirs() -> MutexGuard<'static, Vec<PathBuf>> {
    LIVE_SCRATCH_DIRS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Wipe and remove every scratch directory this process still has.
///
/// For the interrupt handler, which exits without running destructors.
/// Returns how many directories were removed.
pub fn wipe_scratch_dirs() -> usize {
    let dirs = std::mem::take(&mut *live_scratch_dirs());
    dirs.iter().filter(|dir| wipe_dir(dir).is_ok()).count()
}

/// Securely delete every file directly in `dir`, then remove it.
fn wipe_dir(dir: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            secure_delete(&path);
        }
    }
    fs::remove_dir_all(dir)
}

/// Removes its path from `LIVE_SCRATCH_DIRS` when dropped.
struct Registration {
    path: PathBuf,
}

impl Registration {
    fn new(path: &Path) -> Self {
        live_scratch_dirs().push(path.to_path_buf());
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        live_scratch_dirs().retain(|p| p != &self.path);
    }
}

/// A per-process directory for decrypted editor files.
///
/// Several mrs processes may run at once, so each gets its own directory
/// under the shared temp root.  It is removed when dropped, or by
/// `wipe_scratch_dirs` when the process is interrupted.
pub struct ScratchDir {
    dir: tempfile::TempDir,
    _registration: Registration,
}

impl ScratchDir {
    /// Create a fresh scratch directory under `temp_root`.
    pub fn create(temp_root: &Path) -> Result<Self> {
        create_private_dir(temp_root)?;
        let dir = tempfile::Builder::new().prefix("session-").tempdir_in(temp_root)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o700))?;
        }

        let registration = Registration::new(dir.path());
        Ok(Self {
            dir,
            _registration: registration,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to a new owner-only file in this directory.
    ///
    /// The returned guard wipes and removes the file when dropped.
    pub fn write_temp_file(&self, content: &str) -> Result<SecretFile> {
        let (mut file, path) = tempfile::Builder::new()
            .prefix("secrets-")
            .suffix(".txt")
            .tempfile_in(self.dir.path())?
            .keep()
            .map_err(|e| MrsError::Io(e.error))?;

        let guard = SecretFile { path };
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
        Ok(guard)
    }

    /// Remove the directory now, reporting failure.
    pub fn close(self) -> Result<()> {
        let Self { dir, _registration } = self;
        dir.close()?;
        Ok(())
    }
}

/// A temp file holding plaintext.  Wiped and removed on drop.
#[derive(Debug)]
pub struct SecretFile {
    path: PathBuf,
}

impl SecretFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SecretFile {
    fn drop(&mut self) {
        secure_delete(&self.path);
    }
}
