//! OpenAPI documentation for the REST API.
//!
//! Served by Swagger UI in debug builds and printed by
//! `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::attributes::{AttributeResponse, CreateAttributeRequest};
use crate::inbound::http::recipes::{RecipeDetailResponse, RecipeRequest, RecipeResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CreateUserRequest, LoginRequest, ProfileResponse, UpdateProfileRequest,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Accounts, tags, ingredients and recipes scoped to the signed-in user."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::update_current_user,
        crate::inbound::http::attributes::list_tags,
        crate::inbound::http::attributes::create_tag,
        crate::inbound::http::attributes::list_ingredients,
        crate::inbound::http::attributes::create_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserRequest,
        LoginRequest,
        UpdateProfileRequest,
        ProfileResponse,
        CreateAttributeRequest,
        AttributeResponse,
        RecipeRequest,
        RecipeResponse,
        RecipeDetailResponse,
    )),
    tags(
        (name = "users", description = "Registration, login and the caller's profile"),
        (name = "attributes", description = "Tags and ingredients"),
        (name = "recipes", description = "Recipes and their relations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
