use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::{MrsError, Result};

/// Process-wide configuration, computed once at start-up and passed by
/// reference to the vault store and the editor.
///
/// Sources, highest priority first: environment variables, then
/// `<base_dir>/config.toml`, then built-in defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Root of everything mrs stores (`$MRS_HOME`).
    pub base_dir: PathBuf,

    /// Where vault files live: `<base_dir>/vaults`.
    pub vault_dir: PathBuf,

    /// Parent of the per-process scratch directory (`<temp>/mrs`).
    pub temp_root: PathBuf,

    /// Vault used when no `--vault` is given.
    pub default_vault: Option<String>,

    /// Omit the instruction comments at the top of editor sessions.
    pub hide_editor_instructions: bool,

    /// Command used to edit decrypted secrets.
    pub editor: String,
}

/// The optional `config.toml`.  Every field may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub default_vault: Option<String>,

    #[serde(default)]
    pub hide_editor_instructions: bool,

    #[serde(default)]
    pub editor: Option<String>,
}

// ── Environment variable names ───────────────────────────────────────

pub const ENV_HOME: &str = "MRS_HOME";
pub const ENV_TEMP: &str = "MRS_TEMP";
pub const ENV_DEFAULT_VAULT: &str = "MRS_DEFAULT_VAULT_NAME";
pub const ENV_HIDE_INSTRUCTIONS: &str = "MRS_HIDE_EDITOR_INSTRUCTIONS";

fn default_editor() -> String {
    "nano".to_string()
}

// ── Implementation ───────────────────────────────────────────────────

impl FileConfig {
    /// Name of the config file we look for in the base directory.
    pub const FILE_NAME: &'static str = "config.toml";

    /// Load `<base_dir>/config.toml`, or defaults if it does not exist.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(Self::FILE_NAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        toml::from_str(&contents).map_err(|e| {
            MrsError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }
}

impl Settings {
    /// Build settings from the real process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any variable lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let base_dir = match var(ENV_HOME) {
            Some(home) => PathBuf::from(home),
            None => match var("XDG_DATA_HOME") {
                Some(data) => PathBuf::from(data).join("mrs"),
                None => {
                    let home = var("HOME").ok_or_else(|| {
                        MrsError::ConfigError(format!(
                            "cannot locate a home directory; set ${ENV_HOME}"
                        ))
                    })?;
                    PathBuf::from(home).join(".local/share/mrs")
                }
            },
        };

        let temp_root = var(ENV_TEMP)
            .or_else(|| var("XDG_RUNTIME_DIR"))
            .map_or_else(std::env::temp_dir, PathBuf::from)
            .join("mrs");

        let file = FileConfig::load(&base_dir)?;

        let editor = var("VISUAL")
            .or_else(|| var("EDITOR"))
            .or(file.editor)
            .unwrap_or_else(default_editor);

        Ok(Self {
            vault_dir: base_dir.join("vaults"),
            base_dir,
            temp_root,
            default_vault: var(ENV_DEFAULT_VAULT).or(file.default_vault),
            hide_editor_instructions: var(ENV_HIDE_INSTRUCTIONS).is_some()
                || file.hide_editor_instructions,
            editor,
        })
    }

    /// Settings rooted at `base_dir`, ignoring the environment.
    pub fn for_base_dir(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            vault_dir: base_dir.join("vaults"),
            temp_root: base_dir.join("tmp"),
            default_vault: None,
            hide_editor_instructions: false,
            editor: default_editor(),
        }
    }

    /// Create the vault directory (owner-only) if it is missing.
    pub fn ensure_vault_dir(&self) -> Result<&Path> {
        crate::fs::create_private_dir(&self.vault_dir)?;
        Ok(&self.vault_dir)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
