//! `mrs vault create`: create a new, empty (or imported) vault.

use std::path::Path;

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::VaultArgs;
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `vault create` command.
pub fn execute(settings: &Settings, target: &VaultArgs, import_file: Option<&Path>) -> Result<()> {
    let name = prompt::given_or_prompt_name(target.vault.as_deref())?;
    let password = prompt::given_or_prompt_confirmed_password(target.password_file.as_deref())?;

    let mut unlocked = VaultStore::new(settings).create(&name, password, import_file)?;
    unlocked.wipe();

    output::success(&format!("Created vault {unlocked}"));
    if import_file.is_none() {
        output::tip("Run `mrs add` to store your first secret.");
    }
    Ok(())
}
