//! Plaintext password handling and Argon2id password hashes.
//!
//! Plaintext never leaves [`Password`] except through [`Password::expose`]
//! and is zeroised on drop. Only PHC-formatted hashes are persisted.

use std::fmt;

use argon2::Argon2;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
};
use rand_core::OsRng;
use zeroize::Zeroizing;

/// Minimum number of characters accepted for a new password.
pub const PASSWORD_MIN_LEN: usize = 5;

/// Validation errors raised for new passwords.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordValidationError {
    #[error("password must be at least {min} characters")]
    TooShort { min: usize },
}

/// Failure to derive a password hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// A validated plaintext password.
#[derive(Clone)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a new password against the length policy.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::Password;
    ///
    /// assert!(Password::new("abcde").is_ok());
    /// assert!(Password::new("abcd").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.chars().count() < PASSWORD_MIN_LEN {
            return Err(PasswordValidationError::TooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(Self(raw))
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a password with a freshly generated salt.
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordHashError {
                message: err.to_string(),
            })
    }

    /// Wrap a hash loaded from storage.
    ///
    /// The value is not parsed here; a malformed hash simply never verifies.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check a plaintext candidate against this hash.
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = PhcString::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// The PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
