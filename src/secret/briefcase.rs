//! The briefcase: an always-sorted collection of secret records.
//!
//! Text grammar understood by `Briefcase::parse`:
//!
//! - every line is trimmed of surrounding whitespace;
//! - lines that begin with `#` are comments and are skipped;
//! - a blank line ends the current record;
//! - the first line of a record is its key.
//!
//! Serializing a briefcase writes one record per paragraph, so
//! `parse(serialize(b)) == b` for any parsed briefcase.

use std::fmt;
use std::io::BufRead;

use regex::Regex;
use zeroize::Zeroize;

use super::record::Secret;
use crate::errors::Result;

/// Secrets sorted by case-insensitive key.  Ties keep their input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Briefcase {
    secrets: Vec<Secret>,
}

impl Briefcase {
    /// Build a briefcase from records in any order.
    pub fn new(mut secrets: Vec<Secret>) -> Self {
        secrets.sort_by(Secret::cmp_key);
        Self { secrets }
    }

    /// Parse flat text into a briefcase.
    pub fn parse(text: &str) -> Self {
        let mut transcriber = Transcriber::default();
        for line in text.lines() {
            transcriber.push(line);
        }
        transcriber.finish()
    }

    /// Parse from a reader (e.g. a file the user just edited).
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut transcriber = Transcriber::default();
        for line in reader.lines() {
            let mut line = line?;
            transcriber.push(&line);
            line.zeroize();
        }
        Ok(transcriber.finish())
    }

    /// Returns a new briefcase holding the records of both.
    ///
    /// Records with equal keys are all kept.
    pub fn combined(&self, other: &Briefcase) -> Briefcase {
        let merged = self
            .secrets
            .iter()
            .chain(other.secrets.iter())
            .cloned()
            .collect();
        Briefcase::new(merged)
    }

    /// Records whose key matches `pattern`.
    pub fn search_keys(&self, pattern: &Regex) -> Briefcase {
        self.filtered(|s| s.matches_key(pattern))
    }

    /// Records whose key or value matches `pattern`.
    pub fn search_keys_and_values(&self, pattern: &Regex) -> Briefcase {
        self.filtered(|s| s.matches_key_or_value(pattern))
    }

    fn filtered(&self, keep: impl Fn(&Secret) -> bool) -> Briefcase {
        // Filtering preserves order, so no re-sort is needed.
        Briefcase {
            secrets: self.secrets.iter().filter(|s| keep(s)).cloned().collect(),
        }
    }

    /// Serialize to text, one record per paragraph.
    pub fn serialize(&self) -> String {
        self.secrets
            .iter()
            .map(Secret::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Record texts in order, for display.
    pub fn records(&self) -> Vec<&str> {
        self.secrets.iter().map(Secret::as_str).collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.secrets.iter().map(Secret::key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Secret> {
        self.secrets.iter()
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl fmt::Display for Briefcase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, secret) in self.secrets.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(secret.as_str())?;
        }
        Ok(())
    }
}

/// Line-at-a-time record builder shared by `parse` and `from_reader`.
#[derive(Default)]
struct Transcriber {
    entry: String,
    secrets: Vec<Secret>,
}

impl Transcriber {
    fn push(&mut self, raw: &str) {
        let line = raw.trim();
        if line.starts_with('#') {
            return;
        }
        if line.is_empty() {
            self.flush();
            return;
        }
        self.entry.push_str(line);
        self.entry.push('\n');
    }

    fn flush(&mut self) {
        if !self.entry.is_empty() {
            self.secrets.push(Secret::new(std::mem::take(&mut self.entry)));
        }
    }

    fn finish(mut self) -> Briefcase {
        // The last record may not be followed by a blank line.
        self.flush();
        Briefcase::new(std::mem::take(&mut self.secrets))
    }
}
