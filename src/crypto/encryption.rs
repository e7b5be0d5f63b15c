//! AES-256-GCM authenticated encryption under password-derived keys.
//!
//! Each call to `encrypt_with_key` generates a fresh random 12-byte nonce
//! and prepends it to the ciphertext.  `decrypt_with_key` splits the nonce
//! back out before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]
//!
//! `encrypt` / `decrypt` add the password layer on top: they derive the
//! key from `(password, salt)` and own the legacy iteration fallback.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use zeroize::Zeroizing;

use super::kdf::{check_salt, derive_key, CURRENT_ITERATIONS, LEGACY_ITERATIONS};
use crate::errors::{MrsError, Result};

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Why a key-level decryption failed.  Callers turn this into
/// `MrsError::DecryptionFailed` with the vault name attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationFailed;

/// Encrypt `plaintext` with a 32-byte `key`.
///
/// Returns the nonce prepended to the ciphertext (nonce || ciphertext).
pub fn encrypt_with_key(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| MrsError::EncryptionFailed(format!("invalid key length: {e}")))?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| MrsError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(output)
}

/// Decrypt data that was produced by `encrypt_with_key`.
///
/// Expects the first 12 bytes to be the nonce, followed by the ciphertext.
pub fn decrypt_with_key(
    key: &[u8],
    ciphertext_with_nonce: &[u8],
) -> std::result::Result<Zeroizing<Vec<u8>>, AuthenticationFailed> {
    if ciphertext_with_nonce.len() < NONCE_LEN {
        return Err(AuthenticationFailed);
    }

    let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| AuthenticationFailed)?;

    cipher
        .decrypt(nonce, ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| AuthenticationFailed)
}

/// Encrypt `plaintext` under a key derived from `password` and `salt`
/// at the current iteration count.
pub fn encrypt(plaintext: &[u8], password: &[u8], salt: &str) -> Result<Vec<u8>> {
    encrypt_with_iterations(plaintext, password, salt, CURRENT_ITERATIONS)
}

/// Encrypt with an explicit iteration count.
///
/// Only useful for producing vaults in the legacy format; `encrypt` is
/// what every write path uses.
pub fn encrypt_with_iterations(
    plaintext: &[u8],
    password: &[u8],
    salt: &str,
    iterations: u32,
) -> Result<Vec<u8>> {
    let key = derive_key(password, salt, iterations)?;
    encrypt_with_key(key.as_bytes(), plaintext)
}

/// Decrypt data produced by `encrypt`.
///
/// Tries the current iteration count first and falls back to the legacy
/// count exactly once.  `label` names the vault in the error message.
pub fn decrypt(
    ciphertext: &[u8],
    password: &[u8],
    salt: &str,
    label: &str,
) -> Result<Zeroizing<Vec<u8>>> {
    check_salt(salt)?;

    let key = derive_key(password, salt, CURRENT_ITERATIONS)?;
    if let Ok(plaintext) = decrypt_with_key(key.as_bytes(), ciphertext) {
        return Ok(plaintext);
    }
    drop(key);

    tracing::debug!(vault = label, "retrying decryption with legacy iteration count");
    let legacy_key = derive_key(password, salt, LEGACY_ITERATIONS)?;
    decrypt_with_key(legacy_key.as_bytes(), ciphertext)
        .map_err(|_| MrsError::DecryptionFailed(label.to_string()))
}
