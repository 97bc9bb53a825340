//! Integration tests for the document encryption envelopes.
//!
//! This test suite validates:
//! - Round-trips through the JSON and binary envelopes
//! - Fresh randomness per encryption
//! - Tamper detection and wrong-password rejection
//! - Password floor and strength scoring
//! - Format detection
//! - Metadata identity across generations
//! - Storage-backed save/open/unlock

use std::time::{Duration, Instant};

use serde_json::json;
use tempfile::tempdir;
use veilpad_crypto::vault::{self, OpenedDocument, SaveMode};
use veilpad_crypto::{
    base64_decode, base64_encode, decrypt_document, decrypt_from_binary, detect_format,
    encrypt_document, encrypt_to_binary, is_binary_encrypted, is_encrypted, validate_password,
    CryptoError, EncryptedDocument, FileFormat, FilesystemBackend, PasswordStrength,
    PlainDocument, StorageBackend,
};

const PASSWORD: &str = "TestPassword123!";

fn sample_document() -> PlainDocument {
    PlainDocument::new("test.txt", "This is a test document with some content.")
}

fn flip_byte(encoded: &str, index: usize) -> String {
    let mut bytes = base64_decode(encoded).unwrap();
    bytes[index] ^= 0x01;
    base64_encode(&bytes)
}

// ============================================================================
// Round-trips
// ============================================================================

#[test]
fn test_json_roundtrip_preserves_content_and_identity() {
    let doc = sample_document();

    let envelope = encrypt_document(&doc, PASSWORD).unwrap();
    let decrypted = decrypt_document(&envelope, PASSWORD).unwrap();

    assert_eq!(decrypted.content, doc.content);
    assert_eq!(decrypted.metadata.filename, doc.metadata.filename);
    assert_eq!(decrypted.metadata.created, doc.metadata.created);
}

#[test]
fn test_json_roundtrip_through_text() {
    let doc = sample_document();
    let text = encrypt_document(&doc, PASSWORD)
        .unwrap()
        .to_json_pretty()
        .unwrap();

    let parsed = EncryptedDocument::from_json(&text).unwrap();
    assert_eq!(decrypt_document(&parsed, PASSWORD).unwrap().content, doc.content);
}

#[test]
fn test_binary_roundtrip_various_inputs() {
    for text in ["", "a", "line one\nline two\r\n", "emoji 🔒 and ümlauts"] {
        let container = encrypt_to_binary(text, "abc").unwrap();
        assert_eq!(decrypt_from_binary(&container, "abc").unwrap(), text);
    }
}

// ============================================================================
// Fresh randomness
// ============================================================================

#[test]
fn test_same_input_encrypts_differently() {
    let doc = sample_document();

    let first = encrypt_document(&doc, PASSWORD).unwrap();
    let second = encrypt_document(&doc, PASSWORD).unwrap();

    assert_ne!(first.salt, second.salt);
    assert_ne!(first.iv, second.iv);
    assert_ne!(first.ciphertext, second.ciphertext);
}

#[test]
fn test_envelope_field_sizes() {
    let envelope = encrypt_document(&sample_document(), PASSWORD).unwrap();

    assert_eq!(base64_decode(&envelope.salt).unwrap().len(), 16);
    assert_eq!(base64_decode(&envelope.iv).unwrap().len(), 12);
}

// ============================================================================
// Tamper detection
// ============================================================================

#[test]
fn test_json_tamper_detection() {
    let envelope = encrypt_document(&sample_document(), PASSWORD).unwrap();

    let mut tampered_salt = envelope.clone();
    tampered_salt.salt = flip_byte(&envelope.salt, 0);

    let mut tampered_iv = envelope.clone();
    tampered_iv.iv = flip_byte(&envelope.iv, 11);

    let mut tampered_body = envelope.clone();
    tampered_body.ciphertext = flip_byte(&envelope.ciphertext, 0);

    let ciphertext_len = base64_decode(&envelope.ciphertext).unwrap().len();
    let mut tampered_tag = envelope.clone();
    tampered_tag.ciphertext = flip_byte(&envelope.ciphertext, ciphertext_len - 1);

    for tampered in [tampered_salt, tampered_iv, tampered_body, tampered_tag] {
        assert!(matches!(
            decrypt_document(&tampered, PASSWORD),
            Err(CryptoError::DecryptionFailed)
        ));
    }
}

#[test]
fn test_binary_tamper_detection() {
    let container = encrypt_to_binary("tamper me", PASSWORD).unwrap();
    let len = base64_decode(&container).unwrap().len();

    // salt, iv, ciphertext body, tag
    for index in [0, 16, 28, len - 1] {
        let tampered = flip_byte(&container, index);
        assert!(
            matches!(
                decrypt_from_binary(&tampered, PASSWORD),
                Err(CryptoError::DecryptionFailed)
            ),
            "byte {index} not detected"
        );
    }
}

// ============================================================================
// Wrong password rejection
// ============================================================================

#[test]
fn test_wrong_passwords_rejected() {
    let envelope = encrypt_document(&sample_document(), PASSWORD).unwrap();
    let container = encrypt_to_binary("secret", PASSWORD).unwrap();

    for wrong in ["testpassword123!", "TestPassword123", "TestPassword123?", "x"] {
        assert!(matches!(
            decrypt_document(&envelope, wrong),
            Err(CryptoError::DecryptionFailed)
        ));
        assert!(matches!(
            decrypt_from_binary(&container, wrong),
            Err(CryptoError::DecryptionFailed)
        ));
    }
}

#[test]
fn test_wrong_password_and_corruption_are_indistinguishable() {
    let envelope = encrypt_document(&sample_document(), PASSWORD).unwrap();

    let wrong_password = decrypt_document(&envelope, "wrong password").unwrap_err();

    let mut corrupted = envelope.clone();
    corrupted.ciphertext = flip_byte(&envelope.ciphertext, 3);
    let corruption = decrypt_document(&corrupted, PASSWORD).unwrap_err();

    assert_eq!(wrong_password.to_string(), corruption.to_string());
}

// ============================================================================
// Password floor and policy
// ============================================================================

#[test]
fn test_password_floor_both_formats() {
    let doc = sample_document();
    for password in ["", "a", "ab"] {
        assert!(matches!(
            encrypt_document(&doc, password),
            Err(CryptoError::WeakPassword(_))
        ));
        assert!(matches!(
            encrypt_to_binary("x", password),
            Err(CryptoError::WeakPassword(_))
        ));
    }

    assert!(encrypt_document(&doc, "abc").is_ok());
    assert!(encrypt_to_binary("x", "abc").is_ok());

    // A surrogate pair counts as two toward the floor
    let container = encrypt_to_binary("x", "\u{1F600}a").unwrap();
    assert_eq!(decrypt_from_binary(&container, "\u{1F600}a").unwrap(), "x");
}

#[test]
fn test_strength_boundaries() {
    let cases = [
        ("", false, PasswordStrength::Weak),
        ("ab", false, PasswordStrength::Weak),
        ("password", true, PasswordStrength::Weak),
        ("Password123", true, PasswordStrength::Medium),
        ("P@ssw0rd123!", true, PasswordStrength::Strong),
    ];

    for (password, valid, strength) in cases {
        let check = validate_password(password);
        assert_eq!(check.valid, valid, "{password:?}");
        assert_eq!(check.strength, strength, "{password:?}");
        assert!(!check.message.is_empty());
    }
}

// ============================================================================
// Format detection
// ============================================================================

#[test]
fn test_is_encrypted_predicate() {
    assert!(is_encrypted(&json!({
        "encrypted": true, "ciphertext": "x", "salt": "y", "iv": "z", "version": 1
    })));
    assert!(!is_encrypted(&json!({
        "encrypted": false, "ciphertext": "x", "salt": "y", "iv": "z"
    })));
    assert!(!is_encrypted(&serde_json::Value::Null));
    assert!(!is_encrypted(&json!({"encrypted": true, "ciphertext": "x", "iv": "z"})));
}

#[test]
fn test_binary_length_heuristic() {
    assert!(!is_binary_encrypted(&base64_encode(&[0u8; 20])));
    assert!(!is_binary_encrypted(&base64_encode(&[0u8; 27])));
    assert!(is_binary_encrypted(&base64_encode(&[0u8; 44])));
    assert!(is_binary_encrypted(&base64_encode(&[0u8; 100])));
    assert!(!is_binary_encrypted("not valid base64 !!!"));
}

#[test]
fn test_random_base64_passes_sniff_but_fails_decryption() {
    let not_a_container = base64_encode(&[0x5a; 64]);

    assert!(is_binary_encrypted(&not_a_container));
    assert!(matches!(
        decrypt_from_binary(&not_a_container, PASSWORD),
        Err(CryptoError::DecryptionFailed)
    ));
}

// ============================================================================
// Metadata identity across generations
// ============================================================================

#[test]
fn test_identity_survives_generations() {
    let original = sample_document();

    let gen1 = encrypt_document(&original, PASSWORD).unwrap();
    let plain1 = decrypt_document(&gen1, PASSWORD).unwrap();
    let gen2 = encrypt_document(&plain1, PASSWORD).unwrap();
    let plain2 = decrypt_document(&gen2, PASSWORD).unwrap();

    for metadata in [&gen1.metadata, &plain1.metadata, &gen2.metadata, &plain2.metadata] {
        assert_eq!(metadata.filename, original.metadata.filename);
        assert_eq!(metadata.created, original.metadata.created);
    }

    // ISO-8601 UTC timestamps in a fixed format compare chronologically as strings
    assert!(gen2.metadata.encrypted_at >= gen1.metadata.encrypted_at);
    assert!(gen2.metadata.modified >= gen1.metadata.modified);
    assert!(plain2.metadata.modified >= gen2.metadata.modified);
}

// ============================================================================
// Large payloads
// ============================================================================

#[test]
fn test_one_megabyte_roundtrip() {
    let content = "x".repeat(1024 * 1024);
    let started = Instant::now();

    let mut doc = sample_document();
    doc.content = content.clone();
    let envelope = encrypt_document(&doc, PASSWORD).unwrap();
    assert_eq!(decrypt_document(&envelope, PASSWORD).unwrap().content, content);

    let container = encrypt_to_binary(&content, PASSWORD).unwrap();
    assert_eq!(decrypt_from_binary(&container, PASSWORD).unwrap(), content);

    assert!(started.elapsed() < Duration::from_secs(60));
}

// ============================================================================
// Storage-backed workflow
// ============================================================================

#[tokio::test]
async fn test_filesystem_vault_workflow() {
    let dir = tempdir().unwrap();
    let storage = FilesystemBackend::new(dir.path());
    let doc = PlainDocument::new("journal.txt", "Today I wrote some Rust.");

    let mode = SaveMode::for_location("journal.txt", true, Some(PASSWORD)).unwrap();
    vault::save(&storage, "journal.txt", &doc, mode).await.unwrap();

    let on_disk = std::fs::read_to_string(dir.path().join("journal.txt")).unwrap();
    assert_eq!(detect_format(&on_disk), FileFormat::JsonEnvelope);
    assert!(!on_disk.contains("Rust"));

    let opened = vault::open(&storage, "journal.txt").await.unwrap();
    assert!(matches!(opened, OpenedDocument::Locked { .. }));

    let unlocked = vault::unlock(opened, PASSWORD).await.unwrap();
    assert_eq!(unlocked.content, doc.content);
    assert_eq!(unlocked.metadata.created, doc.metadata.created);
}

#[tokio::test]
async fn test_filesystem_binary_workflow() {
    let dir = tempdir().unwrap();
    let storage = FilesystemBackend::new(dir.path());
    let doc = PlainDocument::new("keys.enc", "api-key=12345");

    let mode = SaveMode::for_location("keys.enc", true, Some(PASSWORD)).unwrap();
    assert!(matches!(mode, SaveMode::Binary(_)));
    vault::save(&storage, "keys.enc", &doc, mode).await.unwrap();

    let stored = storage.read("keys.enc").await.unwrap();
    assert_eq!(detect_format(&stored), FileFormat::BinaryEnvelope);

    let opened = vault::open(&storage, "keys.enc").await.unwrap();
    assert!(opened.requires_password());
    assert_eq!(vault::unlock(opened, PASSWORD).await.unwrap().content, doc.content);
}

#[test]
fn test_encrypted_save_without_password() {
    assert!(matches!(
        SaveMode::for_location("journal.txt", true, None),
        Err(CryptoError::PasswordRequired)
    ));
}

#[tokio::test]
async fn test_filesystem_listing_marks_encrypted_names() {
    let dir = tempdir().unwrap();
    let storage = FilesystemBackend::new(dir.path());
    let doc = PlainDocument::new("x", "listed");

    for (location, encrypted) in [("notes.txt", false), ("vault/keys.enc", true)] {
        let mode = SaveMode::for_location(location, encrypted, Some(PASSWORD)).unwrap();
        vault::save(&storage, location, &doc, mode).await.unwrap();
    }

    let listed = vault::list(&storage).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].location, "notes.txt");
    assert!(!listed[0].probably_encrypted);
    assert_eq!(listed[1].location, "vault/keys.enc");
    assert!(listed[1].probably_encrypted);

    // The name guess agrees with what opening finds
    let opened = vault::open(&storage, &listed[1].location).await.unwrap();
    assert!(opened.requires_password());
}
