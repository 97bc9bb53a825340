//! Shared format constants and utilities.
//!
//! None of the parameters below are recorded in the containers themselves.
//! Changing any of them breaks every previously written file.

use base64::Engine;

/// PBKDF2-HMAC-SHA256 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// Salt length in bytes (128 bits).
pub const SALT_LENGTH: usize = 16;

/// AES-GCM nonce length in bytes (96 bits).
pub const IV_LENGTH: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// AES-256 key length in bytes.
pub const KEY_LENGTH: usize = 32;

/// Current JSON envelope version.
pub const FORMAT_VERSION: u32 = 1;

/// Smallest binary container that can be split into salt and IV.
pub const BINARY_HEADER_LENGTH: usize = SALT_LENGTH + IV_LENGTH;

/// Smallest binary container that can hold a GCM tag (empty plaintext).
pub const BINARY_MIN_LENGTH: usize = BINARY_HEADER_LENGTH + TAG_LENGTH;

/// File extension used for binary envelopes.
pub const BINARY_EXTENSION: &str = "enc";

/// Stored document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// JSON envelope with separate salt/iv/ciphertext fields.
    JsonEnvelope,
    /// Base64 `salt ‖ iv ‖ ciphertext` container.
    BinaryEnvelope,
    /// Unencrypted document serialized as `{content, metadata}` JSON.
    PlainDocument,
    /// Anything else.
    PlainText,
}

impl FileFormat {
    /// Whether this format needs a password to read.
    pub fn is_encrypted(self) -> bool {
        matches!(self, Self::JsonEnvelope | Self::BinaryEnvelope)
    }

    /// Short name used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JsonEnvelope => "json-envelope",
            Self::BinaryEnvelope => "binary-envelope",
            Self::PlainDocument => "plain-document",
            Self::PlainText => "plain-text",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode bytes as standard padded base64.
pub fn base64_encode(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

/// Decode standard padded base64.
///
/// Returns `None` on malformed input; callers choose the error kind.
pub fn base64_decode(data: &str) -> Option<Vec<u8>> {
    base64::engine::general_purpose::STANDARD.decode(data).ok()
}
