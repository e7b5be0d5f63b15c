//! Integration tests for the mrs crypto module.

use mrs::crypto::{
    decrypt, derive_key, encrypt, encrypt_with_iterations, generate_salt, secure_compare,
    LEGACY_ITERATIONS, MIN_SALT_LEN,
};
use mrs::errors::MrsError;

const SALT: &str = "abcdefghijklmnopqrstuvwxyz012345";

// ---------------------------------------------------------------------------
// Password-level round-trip
// ---------------------------------------------------------------------------

#[test]
fn encrypt_decrypt_roundtrip() {
    let plaintext = b"GitHub\nuser: alice\ntoken123\n";
    let ciphertext = encrypt(plaintext, b"password", SALT).expect("encrypt");

    // 12-byte nonce + 16-byte tag around the plaintext.
    assert_eq!(ciphertext.len(), plaintext.len() + 28);

    let recovered = decrypt(&ciphertext, b"password", SALT, "work").expect("decrypt");
    assert_eq!(recovered.as_slice(), plaintext);
}

#[test]
fn same_input_encrypts_differently_each_time() {
    let a = encrypt(b"secret", b"password", SALT).unwrap();
    let b = encrypt(b"secret", b"password", SALT).unwrap();
    assert_ne!(a, b, "fresh nonce per encryption");
}

#[test]
fn wrong_password_or_salt_fails_with_vault_name_only() {
    let ciphertext = encrypt(b"secret", b"password", SALT).unwrap();

    let err = decrypt(&ciphertext, b"passw0rd", SALT, "work").unwrap_err();
    assert_eq!(err.to_string(), "failed to decrypt vault work");

    let other_salt = "ABCDEFGHIJKLMNOPQRSTUVWXYZ012345";
    assert!(matches!(
        decrypt(&ciphertext, b"password", other_salt, "work"),
        Err(MrsError::DecryptionFailed(_))
    ));
}

#[test]
fn short_salt_is_rejected_before_decrypting() {
    assert!(matches!(
        encrypt(b"secret", b"password", "short"),
        Err(MrsError::InvalidSalt { .. })
    ));
    assert!(matches!(
        decrypt(b"anything", b"password", "short", "work"),
        Err(MrsError::InvalidSalt { .. })
    ));
}

// ---------------------------------------------------------------------------
// Legacy iteration count
// ---------------------------------------------------------------------------

#[test]
fn legacy_ciphertext_still_decrypts() {
    let ciphertext =
        encrypt_with_iterations(b"old secret", b"password", SALT, LEGACY_ITERATIONS).unwrap();
    let recovered = decrypt(&ciphertext, b"password", SALT, "old").unwrap();
    assert_eq!(recovered.as_slice(), b"old secret");
}

#[test]
fn legacy_ciphertext_with_wrong_password_fails() {
    let ciphertext =
        encrypt_with_iterations(b"old secret", b"password", SALT, LEGACY_ITERATIONS).unwrap();
    assert!(decrypt(&ciphertext, b"wrong-password", SALT, "old").is_err());
}

// ---------------------------------------------------------------------------
// Keys and salts
// ---------------------------------------------------------------------------

#[test]
fn key_derivation_depends_on_every_input() {
    let base = derive_key(b"password", SALT, LEGACY_ITERATIONS).unwrap();
    let again = derive_key(b"password", SALT, LEGACY_ITERATIONS).unwrap();
    assert_eq!(base.as_bytes(), again.as_bytes());

    let other_pw = derive_key(b"password2", SALT, LEGACY_ITERATIONS).unwrap();
    let other_rounds = derive_key(b"password", SALT, LEGACY_ITERATIONS + 1).unwrap();
    assert_ne!(base.as_bytes(), other_pw.as_bytes());
    assert_ne!(base.as_bytes(), other_rounds.as_bytes());
}

#[test]
fn generated_salts_are_unique_and_file_name_safe() {
    let a = generate_salt().unwrap();
    let b = generate_salt().unwrap();
    assert_ne!(a, b);
    assert_eq!(a.chars().count(), MIN_SALT_LEN);
    assert!(a
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}

#[test]
fn secure_compare_basics() {
    assert!(secure_compare(b"password", b"password"));
    assert!(!secure_compare(b"password", b"passwore"));
    assert!(!secure_compare(b"password", b"password1"));
}
