//! CLI module: Clap argument parser, output helpers, prompts and command
//! implementations.

pub mod commands;
pub mod editor;
pub mod output;
pub mod prompt;

use std::path::PathBuf;

use clap::{Args, Parser};

/// Mr. Secretary: organise and secure your secrets.
#[derive(Parser)]
#[command(
    name = "mrs",
    about = "Mr. Secretary - Organise and secure your secrets",
    after_help = "Examples:\n  mrs vault create --vault personal\n  mrs edit\n  mrs search 'secret stuff'",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Which vault to use and how to get its password.
#[derive(Args, Debug, Clone, Default)]
pub struct VaultArgs {
    /// Name (or name prefix) of a vault
    #[arg(short, long = "vault", value_name = "NAME")]
    pub vault: Option<String>,

    /// Path to a file that contains your password
    #[arg(short, long = "password-file", value_name = "PASSWORD_FILE")]
    pub password_file: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add secrets
    Add {
        #[command(flatten)]
        target: VaultArgs,
    },

    /// Edit secrets in $VISUAL / $EDITOR
    Edit {
        #[command(flatten)]
        target: VaultArgs,
    },

    /// Search through your secrets
    Search {
        /// Regular expression; multiple words match any run of whitespace
        #[arg(required = true, value_name = "PATTERN")]
        pattern: Vec<String>,

        /// Search secret values as well as keys
        #[arg(short, long)]
        all: bool,

        #[command(flatten)]
        target: VaultArgs,
    },

    /// Manage vaults
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

/// Vault subcommands.
#[derive(clap::Subcommand)]
pub enum VaultAction {
    /// Create a vault
    Create {
        #[command(flatten)]
        target: VaultArgs,

        /// Path to a file that contains unencrypted secrets
        #[arg(short, long = "import-file", value_name = "IMPORT_FILE")]
        import_file: Option<PathBuf>,
    },

    /// Change a vault's password
    ChangePassword {
        #[command(flatten)]
        target: VaultArgs,
    },

    /// Delete a vault
    Delete {
        /// Name of a vault
        #[arg(short, long = "vault", value_name = "NAME")]
        vault: Option<String>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Print a vault's decrypted secrets
    Export {
        #[command(flatten)]
        target: VaultArgs,
    },

    /// Print the default vault
    ///
    /// Either the vault named by $MRS_DEFAULT_VAULT_NAME, or the first vault.
    GetDefault {
        /// Print the vault path instead of the name
        #[arg(long)]
        path: bool,
    },

    /// List all vaults
    List {
        /// Print vault paths instead of names
        #[arg(long)]
        path: bool,

        /// Show a table with salt and backup details
        #[arg(short, long)]
        long: bool,
    },

    /// Rename a vault
    Rename {
        /// Current vault name
        source: String,
        /// New vault name
        target: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn search_words_and_flags() {
        let cli = Cli::try_parse_from(["mrs", "search", "secret", "stuff", "-a", "-v", "work"])
            .unwrap();
        match cli.command {
            Commands::Search {
                pattern,
                all,
                target,
            } => {
                assert_eq!(pattern, ["secret", "stuff"]);
                assert!(all);
                assert_eq!(target.vault.as_deref(), Some("work"));
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn search_requires_a_pattern() {
        assert!(Cli::try_parse_from(["mrs", "search"]).is_err());
    }

    #[test]
    fn vault_create_flags() {
        let cli = Cli::try_parse_from([
            "mrs", "vault", "create", "-v", "work", "-p", "/tmp/pw", "-i", "/tmp/in",
        ])
        .unwrap();
        match cli.command {
            Commands::Vault {
                action:
                    VaultAction::Create {
                        target,
                        import_file,
                    },
            } => {
                assert_eq!(target.vault.as_deref(), Some("work"));
                assert_eq!(target.password_file, Some(PathBuf::from("/tmp/pw")));
                assert_eq!(import_file, Some(PathBuf::from("/tmp/in")));
            }
            _ => panic!("expected vault create"),
        }
    }

    #[test]
    fn rename_takes_two_names() {
        assert!(Cli::try_parse_from(["mrs", "vault", "rename", "a"]).is_err());
        assert!(Cli::try_parse_from(["mrs", "vault", "rename", "a", "b"]).is_ok());
    }
}
