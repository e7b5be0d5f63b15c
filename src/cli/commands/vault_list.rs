//! `mrs vault list`: print every vault.

use crate::cli::output;
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `vault list` command.
pub fn execute(settings: &Settings, path: bool, long: bool) -> Result<()> {
    let vaults = VaultStore::new(settings).all()?;

    if long {
        output::print_vaults_table(&vaults);
        return Ok(());
    }

    for vault in &vaults {
        if path {
            println!("{}", vault.path().display());
        } else {
            println!("{}", vault.name());
        }
    }
    Ok(())
}
