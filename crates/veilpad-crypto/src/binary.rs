//! Compact binary envelope, used for `.enc` files.
//!
//! # Format
//!
//! A single base64 string (standard alphabet, padded) encoding:
//!
//! ```text
//! ┌──────────────┬────────────┬──────────────────────────────────┐
//! │ salt (16 B)  │ iv (12 B)  │ AES-256-GCM ciphertext ‖ tag     │
//! └──────────────┴────────────┴──────────────────────────────────┘
//! ```
//!
//! There is no metadata; the caller tracks filename and timestamps.

use tracing::debug;

use crate::cipher::{aes_gcm_decrypt, aes_gcm_encrypt, generate_iv, generate_salt};
use crate::error::{CryptoError, CryptoResult};
use crate::format::{
    base64_decode, base64_encode, BINARY_HEADER_LENGTH, BINARY_MIN_LENGTH, IV_LENGTH, SALT_LENGTH,
};
use crate::kdf::derive_key;
use crate::password::ensure_encryption_password;

/// Encrypt text into a base64 binary container.
pub fn encrypt_to_binary(plaintext: &str, password: &str) -> CryptoResult<String> {
    ensure_encryption_password(password)?;

    let salt = generate_salt();
    let iv = generate_iv();
    let ciphertext = {
        let key = derive_key(password, &salt);
        aes_gcm_encrypt(key.as_bytes(), &iv, plaintext.as_bytes())?
    };

    let mut combined = Vec::with_capacity(BINARY_HEADER_LENGTH + ciphertext.len());
    combined.extend_from_slice(&salt);
    combined.extend_from_slice(&iv);
    combined.extend_from_slice(&ciphertext);

    debug!(
        op = "encrypt_to_binary",
        plaintext_len = plaintext.len(),
        container_len = combined.len(),
        "Binary container encrypted"
    );

    Ok(base64_encode(&combined))
}

/// Decrypt a base64 binary container back to text.
pub fn decrypt_from_binary(container: &str, password: &str) -> CryptoResult<String> {
    if password.is_empty() {
        return Err(CryptoError::MissingPassword);
    }

    let combined = base64_decode(container.trim())
        .ok_or_else(|| CryptoError::InvalidFormat("container is not valid base64".to_string()))?;

    if combined.len() < BINARY_HEADER_LENGTH {
        return Err(CryptoError::InvalidFormat(format!(
            "expected at least {} bytes, got {}",
            BINARY_HEADER_LENGTH,
            combined.len()
        )));
    }

    let (salt, rest) = combined.split_at(SALT_LENGTH);
    let (iv, ciphertext) = rest.split_at(IV_LENGTH);
    let salt: &[u8; SALT_LENGTH] = salt
        .try_into()
        .map_err(|_| CryptoError::InvalidFormat("truncated salt".to_string()))?;
    let iv: &[u8; IV_LENGTH] = iv
        .try_into()
        .map_err(|_| CryptoError::InvalidFormat("truncated iv".to_string()))?;

    let plaintext = {
        let key = derive_key(password, salt);
        aes_gcm_decrypt(key.as_bytes(), iv, ciphertext)?
    };

    debug!(
        op = "decrypt_from_binary",
        container_len = combined.len(),
        plaintext_len = plaintext.len(),
        "Binary container decrypted"
    );

    String::from_utf8(plaintext).map_err(|e| CryptoError::CorruptedPayload(e.to_string()))
}

/// Heuristic check for a binary container.
///
/// True when `container` is valid base64 decoding to at least 44 bytes
/// (salt, IV and a GCM tag). Arbitrary base64 data of that size also
/// passes; only a successful [`decrypt_from_binary`] proves the data is a
/// container.
pub fn is_binary_encrypted(container: &str) -> bool {
    base64_decode(container.trim()).is_some_and(|bytes| bytes.len() >= BINARY_MIN_LENGTH)
}
