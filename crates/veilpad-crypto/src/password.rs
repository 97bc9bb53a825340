//! Password policy: the encryption floor and an advisory strength score.

use serde::{Deserialize, Serialize};

/// Minimum password length accepted for encryption.
pub const MIN_PASSWORD_LENGTH: usize = 3;

/// Advisory password strength tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    fn message(self) -> &'static str {
        match self {
            Self::Strong => "Strong password",
            Self::Medium => "Medium strength password",
            Self::Weak => "Weak password. Consider adding uppercase, numbers, and symbols.",
        }
    }
}

/// Result of [`validate_password`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCheck {
    pub valid: bool,
    pub strength: PasswordStrength,
    pub message: String,
}

/// Password length in UTF-16 code units.
///
/// Characters outside the Basic Multilingual Plane (most emoji) count as
/// two, so lengths agree with passwords chosen in browser-based editors.
pub(crate) fn password_length(password: &str) -> usize {
    password.encode_utf16().count()
}

/// Reject passwords below the encryption floor.
pub(crate) fn ensure_encryption_password(password: &str) -> crate::CryptoResult<()> {
    if password_length(password) < MIN_PASSWORD_LENGTH {
        return Err(crate::CryptoError::WeakPassword(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Score a password.
///
/// Advisory only: a `Weak` but valid password still encrypts. The only hard
/// requirement is [`MIN_PASSWORD_LENGTH`].
pub fn validate_password(password: &str) -> PasswordCheck {
    if password.is_empty() {
        return PasswordCheck {
            valid: false,
            strength: PasswordStrength::Weak,
            message: "Password is required".to_string(),
        };
    }

    let length = password_length(password);
    if length < MIN_PASSWORD_LENGTH {
        return PasswordCheck {
            valid: false,
            strength: PasswordStrength::Weak,
            message: format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
        };
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| !c.is_ascii_alphanumeric());

    let criteria = [has_upper, has_lower, has_digit, has_symbol]
        .into_iter()
        .filter(|&met| met)
        .count();

    let strength = if length >= 12 && criteria >= 3 {
        PasswordStrength::Strong
    } else if length >= 10 && criteria >= 2 {
        PasswordStrength::Medium
    } else {
        PasswordStrength::Weak
    };

    PasswordCheck {
        valid: true,
        strength,
        message: strength.message().to_string(),
    }
}
