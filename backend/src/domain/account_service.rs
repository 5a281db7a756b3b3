//! Account registration, authentication and profile services.
//!
//! One service implements the three account-facing driving ports because they
//! share the same repository and the same validation rules.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, CreateAccountRequest, LoginService, ProfileUpdate, UserPersistenceError,
    UserProfileQuery, UserRepository,
};
use crate::domain::{
    Email, Error, LoginCredentials, Password, PasswordHash, PasswordValidationError, User,
    UserFlags, UserId, UserName, UserValidationError,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";

/// Account service backed by a [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<R> {
    users: Arc<R>,
}

impl<R> AccountService<R> {
    /// Create a new service with the given repository.
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }
}

fn field_error(field: &str, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field, "code": code }))
}

fn map_user_validation_error(error: UserValidationError) -> Error {
    let (field, code) = match &error {
        UserValidationError::EmptyEmail => ("email", "empty_email"),
        UserValidationError::InvalidEmail => ("email", "invalid_email"),
        UserValidationError::EmailTooLong { .. } => ("email", "email_too_long"),
        UserValidationError::NameTooLong { .. } => ("name", "name_too_long"),
        UserValidationError::EmptyId | UserValidationError::InvalidId => {
            return Error::internal(format!("invalid user id: {error}"));
        }
    };
    field_error(field, code, error.to_string())
}

fn map_password_error(error: PasswordValidationError) -> Error {
    field_error("password", "password_too_short", error.to_string())
}

fn hash_password(raw: &str) -> Result<PasswordHash, Error> {
    let password = Password::new(raw).map_err(map_password_error)?;
    PasswordHash::hash(&password).map_err(|err| Error::internal(err.to_string()))
}

impl<R> AccountService<R>
where
    R: UserRepository,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => field_error(
                "email",
                "email_taken",
                "a user with this email already exists",
            ),
        }
    }

    async fn register(
        &self,
        email: Option<&str>,
        password: &str,
        name: &str,
        flags: UserFlags,
    ) -> Result<User, Error> {
        let email = email.ok_or_else(|| field_error("email", "missing_field", "email is required"))?;
        let email = Email::parse(email).map_err(map_user_validation_error)?;
        let name = UserName::new(name).map_err(map_user_validation_error)?;
        let password_hash = hash_password(password)?;

        let user = User::new(UserId::random(), email, name, password_hash, flags);
        self.users
            .insert(&user)
            .await
            .map_err(Self::map_user_error)?;
        info!(
            user_id = %user.id(),
            is_superuser = user.is_superuser(),
            "account created"
        );
        Ok(user)
    }

    async fn load(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

#[async_trait]
impl<R> AccountCommand for AccountService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, request: CreateAccountRequest) -> Result<User, Error> {
        let CreateAccountRequest {
            email,
            password,
            name,
        } = request;
        self.register(email.as_deref(), &password, &name, UserFlags::regular())
            .await
    }

    async fn create_superuser(&self, email: &str, password: &str) -> Result<User, Error> {
        self.register(Some(email), password, "", UserFlags::superuser())
            .await
    }

    async fn update_profile(&self, user_id: &UserId, update: ProfileUpdate) -> Result<User, Error> {
        let ProfileUpdate { name, password } = update;
        let name = name
            .as_deref()
            .map(UserName::new)
            .transpose()
            .map_err(map_user_validation_error)?;
        let password_hash = password.as_deref().map(hash_password).transpose()?;

        let mut user = self.load(user_id).await?;
        if let Some(name) = name {
            user = user.with_name(name);
        }
        if let Some(hash) = password_hash {
            user = user.with_password_hash(hash);
        }
        self.users
            .update(&user)
            .await
            .map_err(Self::map_user_error)?;
        Ok(user)
    }
}

#[async_trait]
impl<R> UserProfileQuery for AccountService<R>
where
    R: UserRepository,
{
    async fn profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load(user_id).await
    }
}

#[async_trait]
impl<R> LoginService for AccountService<R>
where
    R: UserRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(Self::map_user_error)?;
        match user {
            Some(user) if user.is_active() && user.check_password(credentials.password()) => {
                Ok(*user.id())
            }
            Some(user) => {
                warn!(user_id = %user.id(), "login rejected");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
            None => {
                info!("login attempted for unknown email");
                Err(Error::unauthorized(INVALID_CREDENTIALS))
            }
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
