//! Cryptographic primitives for mrs.
//!
//! This module provides:
//! - AES-256-GCM encryption and decryption with the legacy fallback (`encryption`)
//! - PBKDF2-HMAC-SHA256 key derivation and salt generation (`kdf`)
//! - Zeroizing key storage and constant-time comparison (`keys`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, generate_salt, ...};
pub use encryption::{decrypt, encrypt, encrypt_with_iterations};
pub use kdf::{
    derive_key, generate_salt, CURRENT_ITERATIONS, LEGACY_ITERATIONS, MIN_SALT_LEN,
};
pub use keys::{secure_compare, DerivedKey};
