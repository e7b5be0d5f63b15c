//! `mrs vault delete`: remove a vault and its backup.

use crate::cli::output;
use crate::cli::prompt;
use crate::config::Settings;
use crate::errors::{MrsError, Result};
use crate::vault::VaultStore;

/// Execute the `vault delete` command.
pub fn execute(settings: &Settings, vault: Option<&str>, force: bool) -> Result<()> {
    let name = prompt::given_or_prompt_name(vault)?;
    let store = VaultStore::new(settings);

    // Resolve before asking, so typos fail without a pointless prompt.
    let vault = store.exact(&name)?;

    if !force && !prompt::confirm(&format!("Delete vault {vault}?"), false)? {
        return Err(MrsError::UserCancelled);
    }

    store.delete(vault.name())?;
    output::success(&format!("Deleted vault {vault}"));
    Ok(())
}
