//! Vault module: naming, discovery, locking and encrypted read/write.
//!
//! - `name`: pure file-name rules (`<name>[.<salt>][.bak]`)
//! - `handle`: the `Vault` value type
//! - `unlocked`: `UnlockedVault`, a vault plus its password
//! - `store`: `VaultStore`, discovery and lifecycle over the vault directory
//! - `lock`: cross-process lock files

pub mod handle;
pub mod lock;
pub mod name;
pub mod store;
pub mod unlocked;

// Re-export the most commonly used items.
pub use handle::Vault;
pub use lock::{LockMode, VaultLock};
pub use name::{validate_name, validate_password, MIN_PASSWORD_LEN};
pub use store::VaultStore;
pub use unlocked::{UnlockedVault, LEGACY_SALT};
