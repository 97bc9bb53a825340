//! Key derivation using PBKDF2-HMAC-SHA256.

use pbkdf2::pbkdf2_hmac_array;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::format::{KEY_LENGTH, PBKDF2_ITERATIONS, SALT_LENGTH};

/// Key wrapper with automatic zeroization on drop.
///
/// Deliberately neither `Clone` nor serializable: a key is derived inside a
/// single encrypt or decrypt call and wiped when that call returns.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_LENGTH],
}

impl DerivedKey {
    /// Get the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive a 256-bit AES key from a password and salt.
///
/// The password's UTF-8 bytes are used as-is (no Unicode normalization).
/// Deterministic for a given (password, salt) pair. Length policy is
/// enforced by the envelope codecs, not here.
pub fn derive_key(password: &str, salt: &[u8; SALT_LENGTH]) -> DerivedKey {
    DerivedKey {
        key: pbkdf2_hmac_array::<Sha256, KEY_LENGTH>(password.as_bytes(), salt, PBKDF2_ITERATIONS),
    }
}
