//! JSON envelope for documents.
//!
//! # Envelope Structure
//!
//! ```json
//! {
//!   "version": 1,
//!   "encrypted": true,
//!   "ciphertext": "<base64: AES-256-GCM output incl. 16-byte tag>",
//!   "salt": "<base64: 16 bytes>",
//!   "iv": "<base64: 12 bytes>",
//!   "metadata": {
//!     "filename": "notes.txt",
//!     "created": "2024-01-01T00:00:00.000Z",
//!     "modified": "2024-01-02T00:00:00.000Z",
//!     "encrypted": true,
//!     "encryptedAt": "2024-01-02T00:00:00.000Z"
//!   }
//! }
//! ```
//!
//! The ciphertext is the encryption of the JSON text `{"content": ..,
//! "metadata": ..}`. The outer metadata is readable without a password.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_iv, generate_salt};
use crate::error::{CryptoError, CryptoResult};
use crate::format::{base64_decode, base64_encode, FORMAT_VERSION, IV_LENGTH, SALT_LENGTH};
use crate::kdf::derive_key;
use crate::password::ensure_encryption_password;

/// Current time as an ISO-8601 UTC timestamp with millisecond precision.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Document identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub filename: String,
    /// Creation time (ISO 8601). Preserved across encryption.
    pub created: String,
    /// Last modification time (ISO 8601). Refreshed on every transform.
    pub modified: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_at: Option<String>,
    /// Keys written by other clients, kept so they round-trip.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DocumentMetadata {
    /// Metadata for a document created now.
    pub fn new(filename: impl Into<String>) -> Self {
        let now = timestamp_now();
        Self {
            filename: filename.into(),
            created: now.clone(),
            modified: now,
            encrypted: None,
            encrypted_at: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Unencrypted document: the input of encryption and output of decryption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainDocument {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl PlainDocument {
    /// Create a new document stamped with the current time.
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata::new(filename),
        }
    }

    /// Copy of this document with `modified` set to now.
    pub fn touched(&self) -> Self {
        let mut doc = self.clone();
        doc.metadata.modified = timestamp_now();
        doc
    }
}

/// Encrypted document envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedDocument {
    /// Format version.
    pub version: u32,

    /// Always `true`.
    #[serde(deserialize_with = "require_true")]
    pub encrypted: bool,

    /// AES-GCM ciphertext with appended tag (base64).
    pub ciphertext: String,

    /// PBKDF2 salt (base64, 16 bytes).
    pub salt: String,

    /// AES-GCM nonce (base64, 12 bytes).
    pub iv: String,

    /// Plaintext metadata, with `encrypted` and `encryptedAt` filled.
    pub metadata: DocumentMetadata,
}

fn require_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    if bool::deserialize(deserializer)? {
        Ok(true)
    } else {
        Err(serde::de::Error::custom("envelope must have \"encrypted\": true"))
    }
}

impl EncryptedDocument {
    /// Parse an envelope from JSON text.
    pub fn from_json(text: &str) -> CryptoResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Parse an envelope from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> CryptoResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize as pretty-printed JSON (the on-disk form).
    pub fn to_json_pretty(&self) -> CryptoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Structural check for the JSON envelope.
///
/// True iff `value` is an object with `"encrypted": true` and `ciphertext`,
/// `salt` and `iv` keys. Field contents are not validated.
pub fn is_encrypted(value: &serde_json::Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };

    obj.get("encrypted") == Some(&serde_json::Value::Bool(true))
        && obj.contains_key("ciphertext")
        && obj.contains_key("salt")
        && obj.contains_key("iv")
}

/// Encrypt a document into a JSON envelope.
///
/// A fresh salt and IV are generated on every call.
pub fn encrypt_document(doc: &PlainDocument, password: &str) -> CryptoResult<EncryptedDocument> {
    ensure_encryption_password(password)?;

    let plaintext = serde_json::to_vec(doc)?;

    let salt = generate_salt();
    let iv = generate_iv();
    let ciphertext = {
        let key = derive_key(password, &salt);
        aes_gcm_encrypt(key.as_bytes(), &iv, &plaintext)?
    };

    let now = timestamp_now();
    let envelope = EncryptedDocument {
        version: FORMAT_VERSION,
        encrypted: true,
        ciphertext: base64_encode(&ciphertext),
        salt: base64_encode(&salt),
        iv: base64_encode(&iv),
        metadata: DocumentMetadata {
            filename: doc.metadata.filename.clone(),
            created: doc.metadata.created.clone(),
            modified: now.clone(),
            encrypted: Some(true),
            encrypted_at: Some(now),
            // Unknown keys stay inside the ciphertext.
            extra: serde_json::Map::new(),
        },
    };

    debug!(
        op = "encrypt_document",
        plaintext_len = plaintext.len(),
        ciphertext_len = ciphertext.len(),
        "Document encrypted"
    );

    Ok(envelope)
}

/// Decrypt a JSON envelope.
///
/// Envelopes from older versions are accepted; newer ones are rejected
/// before any key derivation happens.
pub fn decrypt_document(envelope: &EncryptedDocument, password: &str) -> CryptoResult<PlainDocument> {
    if password.is_empty() {
        return Err(CryptoError::MissingPassword);
    }

    if envelope.version > FORMAT_VERSION {
        return Err(CryptoError::UnsupportedVersion(envelope.version));
    }

    let salt: [u8; SALT_LENGTH] = decode_field(&envelope.salt)?;
    let iv: [u8; IV_LENGTH] = decode_field(&envelope.iv)?;
    let ciphertext = base64_decode(&envelope.ciphertext).ok_or(CryptoError::DecryptionFailed)?;

    let plaintext = {
        let key = derive_key(password, &salt);
        aes_gcm_decrypt(key.as_bytes(), &iv, &ciphertext)?
    };

    let mut doc: PlainDocument = serde_json::from_slice(&plaintext)
        .map_err(|e| CryptoError::CorruptedPayload(e.to_string()))?;
    doc.metadata.modified = timestamp_now();

    debug!(
        op = "decrypt_document",
        version = envelope.version,
        plaintext_len = plaintext.len(),
        "Document decrypted"
    );

    Ok(doc)
}

/// Decode a fixed-size base64 field. Any mismatch is a generic failure.
fn decode_field<const N: usize>(encoded: &str) -> CryptoResult<[u8; N]> {
    base64_decode(encoded)
        .and_then(|bytes| <[u8; N]>::try_from(bytes.as_slice()).ok())
        .ok_or(CryptoError::DecryptionFailed)
}
