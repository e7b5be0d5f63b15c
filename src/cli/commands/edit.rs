//! `mrs edit`: open every secret in the editor.
//!
//! The decrypted vault is written to a temp file in the scratch directory,
//! `$VISUAL` / `$EDITOR` is launched on it, and whatever is saved replaces
//! the vault's content.

use crate::cli::editor::EditorDictation;
use crate::cli::output;
use crate::cli::prompt;
use crate::cli::VaultArgs;
use crate::config::Settings;
use crate::errors::Result;
use crate::fs::ScratchDir;
use crate::secret::workflow;
use crate::vault::VaultStore;

/// Execute the `edit` command.
pub fn execute(settings: &Settings, target: &VaultArgs) -> Result<()> {
    let store = VaultStore::new(settings);
    let vault = super::resolve_vault(&store, target.vault.as_deref())?;
    let password = prompt::given_or_prompt_password(target.password_file.as_deref())?;

    let (vault, _lock) = store.lock_exclusive(&vault)?;
    let mut unlocked = vault.unlocked(password);

    let scratch = ScratchDir::create(&settings.temp_root)?;
    workflow::edit(&mut unlocked, &EditorDictation::new(settings, &scratch))?;
    scratch.close()?;

    output::success(&format!("Saved changes to vault {unlocked}"));
    Ok(())
}
