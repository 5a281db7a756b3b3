//! Driving ports for account registration, login and profile management.
//!
//! Inbound adapters call these use-cases without knowing how users are stored
//! or how passwords are hashed.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User, UserId};

/// Registration input as received from a client.
///
/// `email` is optional so a missing address is reported as a validation
/// failure instead of a deserialisation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub email: Option<String>,
    pub password: String,
    pub name: String,
}

/// Partial change to the caller's own profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Account creation and self-service profile changes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Register a regular user.
    async fn create_user(&self, request: CreateAccountRequest) -> Result<User, Error>;

    /// Register a user with staff and superuser privileges.
    async fn create_superuser(&self, email: &str, password: &str) -> Result<User, Error>;

    /// Apply `update` to the account identified by `user_id`.
    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error>;
}

/// Read access to the caller's own profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fetch the profile for `user_id`.
    async fn profile(&self, user_id: &UserId) -> Result<User, Error>;
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}
