//! One module per subcommand, plus the vault resolution they share.

pub mod add;
pub mod completions;
pub mod edit;
pub mod search;
pub mod vault_change_password;
pub mod vault_create;
pub mod vault_delete;
pub mod vault_export;
pub mod vault_get_default;
pub mod vault_list;
pub mod vault_rename;

use crate::errors::{MrsError, Result};
use crate::vault::{Vault, VaultStore};

/// Pick the vault a command works on.
///
/// An explicit `--vault` is a name prefix.  Without one, the default vault
/// is used.
pub fn resolve_vault(store: &VaultStore<'_>, given: Option<&str>) -> Result<Vault> {
    if let Some(prefix) = given {
        return store.first(prefix);
    }
    store.default_vault()?.ok_or(MrsError::NoVaults)
}
