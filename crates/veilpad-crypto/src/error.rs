//! Error types for document encryption.

use thiserror::Error;

/// Errors raised by the encryption core and the storage workflow around it.
///
/// Decryption failures are deliberately collapsed into a single
/// [`CryptoError::DecryptionFailed`] variant: a wrong password, a tampered
/// tag and a corrupted salt all look identical to the caller.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Password shorter than the encryption floor.
    #[error("Password must be at least {0} characters long")]
    WeakPassword(usize),

    /// Empty password supplied to a decrypt operation.
    #[error("Password is required for decryption")]
    MissingPassword,

    /// Envelope written by a newer version of the format.
    #[error("Unsupported file format version {0}. Please update the app.")]
    UnsupportedVersion(u32),

    /// Wrong password, wrong key, or tampered/corrupted bytes.
    #[error("Failed to decrypt: wrong password or corrupted file")]
    DecryptionFailed,

    /// Input was never a valid container.
    #[error("Invalid encrypted file format: {0}")]
    InvalidFormat(String),

    /// Authenticated plaintext that is not a well-formed document.
    #[error("Failed to parse decrypted document: {0}")]
    CorruptedPayload(String),

    /// Encryption failed.
    #[error("Encryption failed: {0}")]
    Encryption(String),

    /// A document marked as encrypted was saved without a password.
    #[error("Password required to save encrypted document")]
    PasswordRequired,

    /// Storage location does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Blocking task failed to complete.
    #[error("Background task failed: {0}")]
    Task(String),

    /// I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CryptoError {
    /// Whether prompting the user again (for a password) can resolve the error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::WeakPassword(_)
                | Self::MissingPassword
                | Self::DecryptionFailed
                | Self::PasswordRequired
        )
    }
}

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
