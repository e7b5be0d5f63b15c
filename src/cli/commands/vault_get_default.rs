//! `mrs vault get-default`: print the vault used when `--vault` is omitted.

use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `vault get-default` command.
///
/// Prints nothing when there are no vaults.
pub fn execute(settings: &Settings, path: bool) -> Result<()> {
    if let Some(vault) = VaultStore::new(settings).default_vault()? {
        if path {
            println!("{}", vault.path().display());
        } else {
            println!("{}", vault.name());
        }
    }
    Ok(())
}
