//! Login credentials.
//!
//! Inbound adapters build [`LoginCredentials`] from raw strings before calling
//! the login port, so shape errors surface as 400s and never reach a lookup.

use zeroize::Zeroizing;

use super::user::{Email, UserValidationError};

/// Returned when a login payload is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    #[error("email must not be empty")]
    EmptyEmail,
    #[error("email is not a valid address")]
    InvalidEmail,
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalised exactly as at registration.
/// - `password` is non-empty and otherwise kept verbatim.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Cook@Example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "cook@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::parse(email).map_err(|err| match err {
            UserValidationError::EmptyEmail => LoginValidationError::EmptyEmail,
            _ => LoginValidationError::InvalidEmail,
        })?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
