//! Async wrappers that run key derivation off the async runtime.
//!
//! Every envelope operation derives a key with 600,000 PBKDF2 iterations,
//! which takes long enough to stall an executor thread. These wrappers move
//! owned inputs onto tokio's blocking pool. The derived key never leaves
//! the blocking closure.
//!
//! There is no cancellation: dropping the returned future detaches the
//! blocking task, which still runs to completion.

use tokio::task;

use crate::binary;
use crate::document::{self, EncryptedDocument, PlainDocument};
use crate::error::{CryptoError, CryptoResult};

async fn run_blocking<T, F>(f: F) -> CryptoResult<T>
where
    F: FnOnce() -> CryptoResult<T> + Send + 'static,
    T: Send + 'static,
{
    task::spawn_blocking(f)
        .await
        .map_err(|e| CryptoError::Task(e.to_string()))?
}

/// Async [`document::encrypt_document`].
pub async fn encrypt_document(
    doc: PlainDocument,
    password: String,
) -> CryptoResult<EncryptedDocument> {
    run_blocking(move || document::encrypt_document(&doc, &password)).await
}

/// Async [`document::decrypt_document`].
pub async fn decrypt_document(
    envelope: EncryptedDocument,
    password: String,
) -> CryptoResult<PlainDocument> {
    run_blocking(move || document::decrypt_document(&envelope, &password)).await
}

/// Async [`binary::encrypt_to_binary`].
pub async fn encrypt_to_binary(plaintext: String, password: String) -> CryptoResult<String> {
    run_blocking(move || binary::encrypt_to_binary(&plaintext, &password)).await
}

/// Async [`binary::decrypt_from_binary`].
pub async fn decrypt_from_binary(container: String, password: String) -> CryptoResult<String> {
    run_blocking(move || binary::decrypt_from_binary(&container, &password)).await
}
