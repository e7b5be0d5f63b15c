//! `mrs add`: add secrets through the editor.

use crate::cli::editor::EditorDictation;
use crate::cli::output;
use crate::cli::prompt;
use crate::cli::VaultArgs;
use crate::config::Settings;
use crate::errors::Result;
use crate::fs::ScratchDir;
use crate::secret::workflow;
use crate::vault::VaultStore;

/// Execute the `add` command.
pub fn execute(settings: &Settings, target: &VaultArgs) -> Result<()> {
    let store = VaultStore::new(settings);
    let vault = super::resolve_vault(&store, target.vault.as_deref())?;
    let password = prompt::given_or_prompt_password(target.password_file.as_deref())?;

    let (vault, _lock) = store.lock_exclusive(&vault)?;
    let mut unlocked = vault.unlocked(password);

    let scratch = ScratchDir::create(&settings.temp_root)?;
    let added = workflow::add(&mut unlocked, &EditorDictation::new(settings, &scratch))?;
    scratch.close()?;

    if added == 0 {
        output::info(&format!("No secrets added to vault {unlocked}"));
    } else {
        output::success(&format!("{added} secret(s) added to vault {unlocked}"));
    }
    Ok(())
}
