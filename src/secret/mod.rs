//! Secret records and the briefcase that holds them.

pub mod briefcase;
pub mod record;
pub mod workflow;

pub use briefcase::Briefcase;
pub use record::Secret;
pub use workflow::{Dictation, EDITOR_INSTRUCTIONS};
