//! Read-modify-write workflows over an unlocked vault.
//!
//! The new content comes from a `Dictation`, normally an editor session
//! (see `cli::editor`); tests supply canned text instead.

use regex::Regex;

use super::briefcase::Briefcase;
use crate::errors::Result;
use crate::vault::UnlockedVault;

/// Comment block shown at the top of every editor session.
///
/// The trailing blank line leaves an empty paragraph to start typing in.
pub const EDITOR_INSTRUCTIONS: &str = "# Secrets are separated by blank lines.\n\
                                       # The first line of each secret is its unique key.\n\
                                       # Lines that begin with a # character are ignored.\n\n";

/// Source of new briefcase content.
pub trait Dictation {
    /// Present `content` to the user and parse what they hand back.
    fn take_dictation(&self, content: &str) -> Result<Briefcase>;
}

/// Decrypt the vault into a briefcase.
pub fn retrieve(vault: &UnlockedVault) -> Result<Briefcase> {
    let plaintext = vault.read()?;
    Ok(Briefcase::parse(&plaintext))
}

/// Add new secrets to the vault.  Returns how many were added.
///
/// Nothing is written when no secrets were dictated.
pub fn add(vault: &mut UnlockedVault, dictation: &dyn Dictation) -> Result<usize> {
    let current = retrieve(vault)?;
    let added = dictation.take_dictation("\n")?;
    if added.is_empty() {
        return Ok(0);
    }

    let combined = current.combined(&added);
    vault.write(&combined.serialize())?;
    Ok(added.len())
}

/// Let the user rewrite every secret in the vault.
pub fn edit(vault: &mut UnlockedVault, dictation: &dyn Dictation) -> Result<()> {
    let current = retrieve(vault)?;
    let edited = dictation.take_dictation(&current.serialize())?;
    vault.write(&edited.serialize())?;
    Ok(())
}

/// Records whose key (or, with `include_values`, any text) matches `pattern`.
pub fn search(vault: &UnlockedVault, pattern: &Regex, include_values: bool) -> Result<Vec<String>> {
    let briefcase = retrieve(vault)?;
    let found = if include_values {
        briefcase.search_keys_and_values(pattern)
    } else {
        briefcase.search_keys(pattern)
    };
    Ok(found.records().into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;
    use zeroize::Zeroizing;

    use crate::vault::Vault;

    const SALT: &str = "12345678901234567890123456789012";

    /// Hands back fixed text and remembers what it was shown.
    struct Scripted {
        reply: &'static str,
        shown: RefCell<Option<String>>,
    }

    impl Scripted {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                shown: RefCell::new(None),
            }
        }
    }

    impl Dictation for Scripted {
        fn take_dictation(&self, content: &str) -> Result<Briefcase> {
            *self.shown.borrow_mut() = Some(content.to_string());
            Ok(Briefcase::parse(self.reply))
        }
    }

    fn vault_with(tmp: &TempDir, content: &str) -> UnlockedVault {
        let mut v = Vault::from_path(tmp.path().join(format!("work.{SALT}")))
            .unwrap()
            .unlocked(Zeroizing::new(b"password".to_vec()));
        v.write(content).unwrap();
        v
    }

    #[test]
    fn add_combines_and_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let mut v = vault_with(&tmp, "GitHub\ntoken123\n");

        let dictation = Scripted::new("aws\nkey\n\nZoom\npass\n");
        assert_eq!(add(&mut v, &dictation).unwrap(), 2);
        assert_eq!(dictation.shown.borrow().as_deref(), Some("\n"));

        let keys: Vec<String> = retrieve(&v).unwrap().keys().map(String::from).collect();
        assert_eq!(keys, ["aws", "GitHub", "Zoom"]);
    }

    #[test]
    fn add_nothing_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let mut v = vault_with(&tmp, "GitHub\ntoken123\n");
        let before = std::fs::read(v.vault().path()).unwrap();

        assert_eq!(add(&mut v, &Scripted::new("# only a comment\n\n")).unwrap(), 0);
        assert_eq!(std::fs::read(v.vault().path()).unwrap(), before);
        assert!(!v.vault().backup_path().exists());
    }

    #[test]
    fn edit_starts_from_current_content_and_replaces_it() {
        let tmp = TempDir::new().unwrap();
        let mut v = vault_with(&tmp, "b\n2\n\na\n1\n");

        let dictation = Scripted::new("c\n3\n");
        edit(&mut v, &dictation).unwrap();

        assert_eq!(dictation.shown.borrow().as_deref(), Some("a\n1\n\nb\n2\n"));
        assert_eq!(v.read().unwrap().as_str(), "c\n3\n");
    }

    #[test]
    fn edit_to_empty_clears_the_vault() {
        let tmp = TempDir::new().unwrap();
        let mut v = vault_with(&tmp, "a\n1\n");
        edit(&mut v, &Scripted::new("")).unwrap();
        assert!(retrieve(&v).unwrap().is_empty());
    }

    #[test]
    fn search_keys_only_or_values_too() {
        let tmp = TempDir::new().unwrap();
        let v = vault_with(&tmp, "GitHub\nuser: alice\n\nemail\ngithub-alias\n");
        let pattern = Regex::new("(?i)github").unwrap();

        let by_key = search(&v, &pattern, false).unwrap();
        assert_eq!(by_key, ["GitHub\nuser: alice\n"]);

        let all = search(&v, &pattern, true).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.contains(&by_key[0]));
    }

    #[test]
    fn instructions_are_comments_and_parse_to_nothing() {
        assert!(Briefcase::parse(EDITOR_INSTRUCTIONS).is_empty());
        assert!(EDITOR_INSTRUCTIONS.ends_with("\n\n"));
    }
}
