//! `mrs completions`: generate shell completion scripts.
//!
//! Usage:
//!   mrs completions bash > ~/.local/share/bash-completion/completions/mrs
//!   mrs completions zsh > ~/.zfunc/_mrs
//!   mrs completions fish > ~/.config/fish/completions/mrs.fish

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{MrsError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "mrs", &mut io::stdout());
    Ok(())
}

/// Parse a shell name string into a `Shell` enum.
fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "zsh" => Ok(Shell::Zsh),
        "fish" => Ok(Shell::Fish),
        "powershell" | "ps" => Ok(Shell::PowerShell),
        "elvish" => Ok(Shell::Elvish),
        other => Err(MrsError::CommandFailed(format!(
            "unknown shell '{other}'; supported: bash, zsh, fish, powershell, elvish"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_shells_in_any_case() {
        assert_eq!(parse_shell("bash").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("Zsh").unwrap(), Shell::Zsh);
        assert_eq!(parse_shell("FISH").unwrap(), Shell::Fish);
        assert_eq!(parse_shell("ps").unwrap(), Shell::PowerShell);
        assert_eq!(parse_shell("elvish").unwrap(), Shell::Elvish);
    }

    #[test]
    fn generates_a_script_mentioning_vault_commands() {
        let mut buf = Vec::new();
        generate(Shell::Bash, &mut Cli::command(), "mrs", &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("change-password"));
    }

    #[test]
    fn unknown_shell_fails() {
        assert!(parse_shell("csh").is_err());
        assert!(parse_shell("").is_err());
    }
}
