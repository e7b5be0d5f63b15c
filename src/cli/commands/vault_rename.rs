//! `mrs vault rename`: give a vault a new name, keeping its salt.

use crate::cli::output;
use crate::config::Settings;
use crate::errors::Result;
use crate::vault::VaultStore;

/// Execute the `vault rename` command.
pub fn execute(settings: &Settings, source: &str, target: &str) -> Result<()> {
    let renamed = VaultStore::new(settings).rename(source, target)?;
    output::success(&format!("Renamed vault {source} to {renamed}"));
    Ok(())
}
