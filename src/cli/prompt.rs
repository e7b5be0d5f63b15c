//! Interactive prompts and password files.
//!
//! Passwords come back as `Zeroizing<Vec<u8>>` whichever way they were
//! obtained, so they are wiped from memory on drop.

use std::path::Path;

use dialoguer::{Confirm, Input, Password};
use zeroize::Zeroizing;

use crate::crypto::secure_compare;
use crate::errors::{MrsError, Result};

/// The given vault name, or one typed at the prompt.
pub fn given_or_prompt_name(given: Option<&str>) -> Result<String> {
    if let Some(name) = given {
        return Ok(name.to_string());
    }
    let name: String = Input::new()
        .with_prompt("Vault name")
        .interact_text()
        .map_err(|e| MrsError::CommandFailed(format!("name prompt: {e}")))?;
    Ok(name.trim().to_string())
}

/// The password from `password_file`, or one typed at the prompt.
pub fn given_or_prompt_password(password_file: Option<&Path>) -> Result<Zeroizing<Vec<u8>>> {
    match password_file {
        Some(path) => read_password_file(path),
        None => password("Vault password"),
    }
}

/// Like `given_or_prompt_password`, but a typed password must be entered
/// twice.
pub fn given_or_prompt_confirmed_password(
    password_file: Option<&Path>,
) -> Result<Zeroizing<Vec<u8>>> {
    match password_file {
        Some(path) => read_password_file(path),
        None => confirmed_password("Vault password"),
    }
}

/// Prompt for a new password and its confirmation.
pub fn new_password() -> Result<Zeroizing<Vec<u8>>> {
    confirmed_password("New password")
}

fn confirmed_password(prompt: &str) -> Result<Zeroizing<Vec<u8>>> {
    let first = password(prompt)?;
    let second = password("Confirm password")?;
    if !secure_compare(&first, &second) {
        return Err(MrsError::PasswordMismatch);
    }
    Ok(first)
}

fn password(prompt: &str) -> Result<Zeroizing<Vec<u8>>> {
    let pw = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| MrsError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw.into_bytes()))
}

/// Read a password from the first line of `path`.
pub fn read_password_file(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    let contents = Zeroizing::new(std::fs::read(path).map_err(|e| {
        MrsError::CommandFailed(format!(
            "could not read from password file {}: {e}",
            path.display()
        ))
    })?);

    let line = contents.split(|b| *b == b'\n').next().unwrap_or_default();
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    Ok(Zeroizing::new(line.to_vec()))
}

/// Ask a yes/no question; `default` is used when the user just hits enter.
pub fn confirm(question: &str, default: bool) -> Result<bool> {
    Confirm::new()
        .with_prompt(question)
        .default(default)
        .interact()
        .map_err(|e| MrsError::CommandFailed(format!("confirm prompt: {e}")))
}
