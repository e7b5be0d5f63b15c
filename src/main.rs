use clap::Parser;
use mrs::cli::commands;
use mrs::cli::{Cli, Commands, VaultAction};
use mrs::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MRS_LOG").unwrap_or_else(|_| EnvFilter::new("mrs=info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Ctrl-C while the editor is open would otherwise leave decrypted
    // secrets in the scratch directory.
    if let Err(e) = ctrlc::set_handler(|| {
        if mrs::fs::wipe_scratch_dirs() > 0 {
            mrs::cli::output::warning("Interrupted; removed the temporary files holding secrets");
        } else {
            mrs::cli::output::warning("Interrupted");
        }
        std::process::exit(130);
    }) {
        tracing::warn!("could not install interrupt handler: {e}");
    }

    let cli = Cli::parse();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            mrs::cli::output::error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Add { ref target } => commands::add::execute(&settings, target),
        Commands::Edit { ref target } => commands::edit::execute(&settings, target),
        Commands::Search {
            ref pattern,
            all,
            ref target,
        } => commands::search::execute(&settings, pattern, all, target),
        Commands::Vault { ref action } => match action {
            VaultAction::Create {
                ref target,
                ref import_file,
            } => commands::vault_create::execute(&settings, target, import_file.as_deref()),
            VaultAction::ChangePassword { ref target } => {
                commands::vault_change_password::execute(&settings, target)
            }
            VaultAction::Delete { ref vault, force } => {
                commands::vault_delete::execute(&settings, vault.as_deref(), *force)
            }
            VaultAction::Export { ref target } => {
                commands::vault_export::execute(&settings, target)
            }
            VaultAction::GetDefault { path } => {
                commands::vault_get_default::execute(&settings, *path)
            }
            VaultAction::List { path, long } => {
                commands::vault_list::execute(&settings, *path, *long)
            }
            VaultAction::Rename {
                ref source,
                ref target,
            } => commands::vault_rename::execute(&settings, source, target),
        },
        Commands::Completions { ref shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        mrs::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
