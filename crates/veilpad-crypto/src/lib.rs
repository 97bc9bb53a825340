//! # veilpad-crypto
//!
//! Password-based document encryption for the veilpad editor.
//!
//! Documents are protected at rest with a single password. Nothing else
//! (no key files, no recipients, no hardware keys) is involved.
//!
//! ## Cryptographic Primitives
//!
//! - **Symmetric cipher**: AES-256-GCM (AEAD), 96-bit random IV, tag appended
//! - **Key derivation**: PBKDF2-HMAC-SHA256, 600,000 iterations, 128-bit random salt
//! - **Random generation**: `rand::thread_rng` (ChaCha-based CSPRNG seeded from the OS)
//!
//! The iteration count is not stored in either container format. It is a
//! fixed part of the format.
//!
//! ## Container Formats
//!
//! JSON envelope (any file):
//!
//! ```text
//! { "version": 1, "encrypted": true,
//!   "ciphertext": "<b64>", "salt": "<b64>", "iv": "<b64>",
//!   "metadata": { "filename", "created", "modified", "encrypted", "encryptedAt" } }
//! ```
//!
//! Binary envelope (`.enc` files), one base64 string:
//!
//! ```text
//! ┌──────────────┬────────────┬──────────────────────────────────┐
//! │ salt (16 B)  │ iv (12 B)  │ ciphertext ‖ tag (16 B)          │
//! └──────────────┴────────────┴──────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ### Encrypt a Document
//!
//! ```rust
//! use veilpad_crypto::{decrypt_document, encrypt_document, PlainDocument};
//!
//! let doc = PlainDocument::new("diary.txt", "Dear diary...");
//! let envelope = encrypt_document(&doc, "correct horse").unwrap();
//!
//! let restored = decrypt_document(&envelope, "correct horse").unwrap();
//! assert_eq!(restored.content, "Dear diary...");
//! assert_eq!(restored.metadata.filename, "diary.txt");
//! ```
//!
//! ### Binary Container
//!
//! ```rust
//! use veilpad_crypto::{decrypt_from_binary, encrypt_to_binary, is_binary_encrypted};
//!
//! let container = encrypt_to_binary("plain text", "correct horse").unwrap();
//! assert!(is_binary_encrypted(&container));
//! assert_eq!(decrypt_from_binary(&container, "correct horse").unwrap(), "plain text");
//! ```
//!
//! ### Password Strength
//!
//! ```rust
//! use veilpad_crypto::{validate_password, PasswordStrength};
//!
//! let check = validate_password("P@ssw0rd123!");
//! assert!(check.valid);
//! assert_eq!(check.strength, PasswordStrength::Strong);
//! ```
//!
//! ### Format Detection
//!
//! ```rust
//! use veilpad_crypto::{detect_format, FileFormat};
//!
//! match detect_format("Some text") {
//!     FileFormat::JsonEnvelope | FileFormat::BinaryEnvelope => println!("Encrypted"),
//!     _ => println!("Not encrypted"),
//! }
//! ```
//!
//! Keys derived from passwords never leave this crate: each call derives
//! its key, uses it once, and wipes it on return.
//!
//! Every encrypt/decrypt call runs 600,000 PBKDF2 iterations. From async
//! code, use the wrappers in [`offload`] or the [`vault`] workflow.

pub mod binary;
pub mod cipher;
pub mod detect;
pub mod document;
pub mod error;
pub mod format;
mod kdf;
pub mod offload;
pub mod password;
pub mod storage;
pub mod vault;

// Re-export commonly used types
pub use binary::{decrypt_from_binary, encrypt_to_binary, is_binary_encrypted};
pub use detect::{detect_format, has_binary_extension, is_any_encrypted, looks_encrypted_name};
pub use document::{
    decrypt_document, encrypt_document, is_encrypted, DocumentMetadata, EncryptedDocument,
    PlainDocument,
};
pub use error::{CryptoError, CryptoResult};
pub use format::{base64_decode, base64_encode, FileFormat, FORMAT_VERSION, PBKDF2_ITERATIONS};
pub use password::{validate_password, PasswordCheck, PasswordStrength, MIN_PASSWORD_LENGTH};
pub use storage::{FilesystemBackend, MemoryBackend, StorageBackend, StorageConfig};
pub use vault::{ListedDocument, OpenedDocument, SaveMode};

#[cfg(test)]
mod integration_tests {
    use super::*;

    /// Encrypt -> detect -> decrypt for both container formats.
    #[test]
    fn test_full_workflow() {
        let doc = PlainDocument::new("notes.txt", "Shared secret data");

        let envelope = encrypt_document(&doc, "team-password").unwrap();
        let text = envelope.to_json_pretty().unwrap();
        assert_eq!(detect_format(&text), FileFormat::JsonEnvelope);

        let parsed = EncryptedDocument::from_json(&text).unwrap();
        let restored = decrypt_document(&parsed, "team-password").unwrap();
        assert_eq!(restored.content, doc.content);

        let container = encrypt_to_binary(&doc.content, "team-password").unwrap();
        assert_eq!(detect_format(&container), FileFormat::BinaryEnvelope);
        assert_eq!(
            decrypt_from_binary(&container, "team-password").unwrap(),
            doc.content
        );

        // Wrong password fails both ways
        assert!(decrypt_document(&parsed, "Team-password").is_err());
        assert!(decrypt_from_binary(&container, "team-passwor").is_err());
    }

    /// The policy is advisory: a weak but valid password still encrypts.
    #[test]
    fn test_weak_password_still_encrypts() {
        let check = validate_password("abc");
        assert!(check.valid);
        assert_eq!(check.strength, PasswordStrength::Weak);

        assert!(encrypt_to_binary("text", "abc").is_ok());
    }
}
