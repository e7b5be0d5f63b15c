//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::Vault;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of vaults (Name, Salt, Backup, Path).
pub fn print_vaults_table(vaults: &[Vault]) {
    if vaults.is_empty() {
        info("No vaults yet.");
        tip("Run `mrs vault create` to create your first vault.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Name", "Salt", "Backup", "Path"]);

    for v in vaults {
        let salt = v.salt().unwrap_or("legacy").to_string();
        let backup = if v.backup_path().exists() { "yes" } else { "no" };
        table.add_row(vec![
            v.name().to_string(),
            salt,
            backup.to_string(),
            v.path().display().to_string(),
        ]);
    }

    println!("{table}");
}
