//! Password-based key derivation using PBKDF2-HMAC-SHA256.
//!
//! Two iteration counts are recognised.  Every vault written today uses
//! `CURRENT_ITERATIONS`; `LEGACY_ITERATIONS` is only ever tried as a
//! fallback when decrypting vaults written before the increase.
//!
//! Salts are strings rather than raw bytes because they live in vault
//! file names (`<name>.<salt>`).

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use sha2::Sha256;
use zeroize::Zeroize;

use super::keys::DerivedKey;
use crate::errors::{MrsError, Result};

/// Minimum salt length in characters.
pub const MIN_SALT_LEN: usize = 32;

/// Iteration count used for every newly written vault.
pub const CURRENT_ITERATIONS: u32 = 600_000;

/// Iteration count used by vaults written before the increase.
pub const LEGACY_ITERATIONS: u32 = 4_096;

/// Length of the derived key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// Derive a 32-byte key from a password and salt.
///
/// The same password + salt + iterations always produce the same key.
/// Salts shorter than `MIN_SALT_LEN` are rejected before any work is done.
pub fn derive_key(password: &[u8], salt: &str, iterations: u32) -> Result<DerivedKey> {
    check_salt(salt)?;
    if iterations < 1 {
        return Err(MrsError::KeyDerivationFailed(
            "PBKDF2 iterations must be at least 1".into(),
        ));
    }

    let mut bytes = [0u8; KEY_LEN];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt.as_bytes(), iterations, &mut bytes);
    let key = DerivedKey::new(bytes);
    bytes.zeroize();
    Ok(key)
}

/// Generate a random salt of exactly `MIN_SALT_LEN` URL-safe characters.
///
/// The output alphabet is `[A-Za-z0-9_-]`, so a salt is also a valid
/// vault name segment.
pub fn generate_salt() -> Result<String> {
    let mut raw = [0u8; MIN_SALT_LEN];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|e| MrsError::KeyDerivationFailed(format!("OS random generator failed: {e}")))?;

    let mut encoded = URL_SAFE_NO_PAD.encode(raw);
    raw.zeroize();
    encoded.truncate(MIN_SALT_LEN);
    Ok(encoded)
}

/// Reject salts that are too short to be used for key derivation.
pub fn check_salt(salt: &str) -> Result<()> {
    let actual = salt.chars().count();
    if actual < MIN_SALT_LEN {
        return Err(MrsError::InvalidSalt {
            min: MIN_SALT_LEN,
            actual,
        });
    }
    Ok(())
}
