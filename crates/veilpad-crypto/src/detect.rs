//! Format detection for stored documents.
//!
//! Detection is a structural sniff. A positive result for
//! [`FileFormat::BinaryEnvelope`] in particular only means the text is
//! base64 long enough to be a container.

use std::path::Path;

use crate::binary::is_binary_encrypted;
use crate::document::is_encrypted;
use crate::format::{FileFormat, BINARY_EXTENSION};

/// Detect the format of stored document text.
///
/// JSON is checked first: an envelope wins over a plain document, and any
/// other JSON is treated as plain text. Non-JSON text is a binary envelope
/// if it passes [`is_binary_encrypted`].
pub fn detect_format(text: &str) -> FileFormat {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) if is_encrypted(&value) => FileFormat::JsonEnvelope,
        Ok(value) if is_plain_document(&value) => FileFormat::PlainDocument,
        Ok(_) => FileFormat::PlainText,
        Err(_) if is_binary_encrypted(text) => FileFormat::BinaryEnvelope,
        Err(_) => FileFormat::PlainText,
    }
}

/// Check if stored text is in either encrypted format.
pub fn is_any_encrypted(text: &str) -> bool {
    detect_format(text).is_encrypted()
}

/// Whether `value` looks like a serialized unencrypted document.
pub(crate) fn is_plain_document(value: &serde_json::Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("content") && obj.contains_key("metadata"))
}

/// Check if a file name uses the binary envelope extension (`.enc`).
///
/// The match ignores ASCII case, so `NOTES.ENC` counts as well.
pub fn has_binary_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BINARY_EXTENSION))
}

/// Guess from a file name alone whether it holds an encrypted document.
///
/// Used by [`crate::vault::list`], where reading every file is too expensive.
pub fn looks_encrypted_name(name: &str) -> bool {
    name.contains(".encrypted") || has_binary_extension(name)
}
