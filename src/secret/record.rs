//! A single secret record.
//!
//! A record is raw text whose first line is its key and whose remaining
//! lines are free-form value content:
//!
//! ```text
//! GitHub
//! user: octocat
//! token: ghp_...
//! ```

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use zeroize::Zeroize;

/// One secret record.  The text is zeroized when the record is dropped.
#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct Secret {
    text: String,
}

impl Secret {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The first line of the record.
    pub fn key(&self) -> &str {
        self.text.split('\n').next().unwrap_or_default()
    }

    /// Everything after the key line.
    pub fn value(&self) -> &str {
        self.text.split_once('\n').map_or("", |(_, rest)| rest)
    }

    /// The full record text, key line included.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Case-insensitive key ordering.
    pub fn cmp_key(&self, other: &Self) -> Ordering {
        let a = self.key().chars().flat_map(char::to_lowercase);
        let b = other.key().chars().flat_map(char::to_lowercase);
        a.cmp(b)
    }

    pub fn matches_key(&self, pattern: &Regex) -> bool {
        pattern.is_match(self.key())
    }

    pub fn matches_key_or_value(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.text)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// Never print secret values through `{:?}`.
impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret").field("key", &self.key()).finish()
    }
}
