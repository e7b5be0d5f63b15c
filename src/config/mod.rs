//! Configuration: environment variables plus an optional `config.toml`.

pub mod settings;

pub use settings::{FileConfig, Settings};
