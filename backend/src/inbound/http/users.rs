//! Account handlers: registration, login, logout and the caller's profile.
//!
//! ```text
//! POST  /api/v1/users     {"email":"cook@example.com","password":"secret","name":"Cook"}
//! POST  /api/v1/login     {"email":"cook@example.com","password":"secret"}
//! POST  /api/v1/logout
//! GET   /api/v1/users/me
//! PATCH /api/v1/users/me  {"name":"Head Cook"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{CreateAccountRequest, ProfileUpdate};
use crate::domain::{Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /api/v1/users`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    /// Normalised to lower case before storage.
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

impl From<CreateUserRequest> for CreateAccountRequest {
    fn from(value: CreateUserRequest) -> Self {
        Self {
            email: value.email,
            password: value.password,
            name: value.name,
        }
    }
}

/// Login body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Body for `PATCH /api/v1/users/me`; omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(value: UpdateProfileRequest) -> Self {
        Self {
            name: value.name,
            password: value.password,
        }
    }
}

/// Public view of an account. The password hash never leaves the domain.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: Uuid,
    #[schema(example = "cook@example.com")]
    pub email: String,
    #[schema(example = "Cook")]
    pub name: String,
    pub is_staff: bool,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().to_string(),
            name: user.name().as_ref().to_owned(),
            is_staff: user.is_staff(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "empty_email"),
        LoginValidationError::InvalidEmail => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = state
        .accounts
        .create_user(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(ProfileResponse::from(&user)))
}

/// Authenticate and establish a session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    info!(%user_id, "session established");
    Ok(HttpResponse::Ok().finish())
}

/// End the current session. Succeeds whether or not one exists.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The caller's profile.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.profile.profile(&user_id).await?;
    Ok(web::Json(ProfileResponse::from(&user)))
}

/// Change the caller's name or password.
#[utoipa::path(
    patch,
    path = "/api/v1/users/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateCurrentUser"
)]
#[patch("/users/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let user = state
        .accounts
        .update_profile(&user_id, payload.into_inner().into())
        .await?;
    Ok(web::Json(ProfileResponse::from(&user)))
}
