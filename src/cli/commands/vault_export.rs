//! `mrs vault export`: print a vault's plaintext to stdout.

use std::io::{self, Write};

use crate::cli::prompt;
use crate::cli::VaultArgs;
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `vault export` command.
pub fn execute(settings: &Settings, target: &VaultArgs) -> Result<()> {
    let name = prompt::given_or_prompt_name(target.vault.as_deref())?;
    let password = prompt::given_or_prompt_password(target.password_file.as_deref())?;

    let plaintext = VaultStore::new(settings).export(&name, password)?;

    let mut stdout = io::stdout().lock();
    stdout.write_all(plaintext.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
