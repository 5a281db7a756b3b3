//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities used by the HTTP and
//! persistence layers, and the services that enforce the rules around them.
//! Values are validated on construction, so anything holding a [`Recipe`] or
//! [`User`] can rely on its invariants.
//!
//! Public surface:
//! - [`Error`] and [`ErrorCode`]: the API error payload.
//! - [`User`], [`Email`], [`Password`]: accounts and credentials.
//! - [`Attribute`]: a user's tag or ingredient.
//! - [`Recipe`], [`RecipeFields`], [`RecipeFilter`]: recipes and their input.
//! - Services implementing the driving ports in [`ports`].

pub mod account_service;
pub mod attribute;
pub mod attribute_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod recipe;
pub mod recipe_service;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::attribute::{
    Attribute, AttributeId, AttributeKind, AttributeName, AttributeValidationError,
    sort_for_listing,
};
pub use self::attribute_service::AttributeService;
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{
    PASSWORD_MIN_LEN, Password, PasswordHash, PasswordHashError, PasswordValidationError,
};
pub use self::recipe::{
    Price, Recipe, RecipeDraft, RecipeFields, RecipeFilter, RecipeId, RecipeLink, RecipeParts,
    RecipePatch, RecipeTitle, RecipeValidationError, TimeMinutes,
};
pub use self::recipe_service::RecipeService;
pub use self::trace_id::TraceId;
pub use self::user::{Email, User, UserFlags, UserId, UserName, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such recipe"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
