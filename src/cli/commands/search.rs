//! `mrs search`: print the secrets whose key (or text) matches a pattern.

use regex::Regex;

use crate::cli::output;
use crate::cli::prompt;
use crate::cli::VaultArgs;
use crate::config::Settings;
use crate::errors::{MrsError, Result};
use crate::secret::workflow;
use crate::vault::VaultStore;

/// Execute the `search` command.
pub fn execute(
    settings: &Settings,
    words: &[String],
    include_values: bool,
    target: &VaultArgs,
) -> Result<()> {
    // Compile before prompting for anything.
    let pattern = compile_pattern(words)?;

    let store = VaultStore::new(settings);
    let vault = super::resolve_vault(&store, target.vault.as_deref())?;
    let password = prompt::given_or_prompt_password(target.password_file.as_deref())?;

    let (vault, _lock) = store.lock_shared(&vault)?;
    let unlocked = vault.unlocked(password);
    let found = workflow::search(&unlocked, &pattern, include_values)?;

    if found.is_empty() {
        output::info(&format!(
            "No secrets matched regular expression \"{pattern}\" in vault {unlocked}"
        ));
        return Ok(());
    }

    output::info(&format!(
        "{} secret(s) matched regular expression \"{pattern}\" in vault {unlocked}",
        found.len()
    ));
    println!();
    print!("{}", found.join("\n"));
    Ok(())
}

/// Join the words with `\s+`, so `mrs search secret stuff` also matches
/// "secret   stuff" and "secret\nstuff".
fn compile_pattern(words: &[String]) -> Result<Regex> {
    let source = words.join(r"\s+");
    Regex::new(&source).map_err(|e| MrsError::InvalidPattern {
        pattern: source.clone(),
        reason: e.to_string(),
    })
}
