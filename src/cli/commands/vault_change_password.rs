//! `mrs vault change-password`: re-encrypt a vault under a new password.

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::VaultArgs;
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `vault change-password` command.
pub fn execute(settings: &Settings, target: &VaultArgs) -> Result<()> {
    let name = prompt::given_or_prompt_name(target.vault.as_deref())?;
    let old_password = prompt::given_or_prompt_password(target.password_file.as_deref())?;
    let new_password = prompt::new_password()?;

    let mut unlocked =
        VaultStore::new(settings).change_password(&name, old_password, new_password)?;
    unlocked.wipe();

    output::success(&format!("Changed password of vault {unlocked}"));
    Ok(())
}
