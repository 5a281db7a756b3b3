//! Tag and ingredient handlers.
//!
//! ```text
//! GET  /api/v1/tags?assigned_only=1
//! POST /api/v1/tags {"name":"Vegan"}
//! GET  /api/v1/ingredients
//! POST /api/v1/ingredients {"name":"Basil"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Attribute, AttributeKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_bool_flag};

const NAME_FIELD: FieldName = FieldName::new("name");
const ASSIGNED_ONLY_FIELD: FieldName = FieldName::new("assigned_only");

/// Query string for attribute listings.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttributeListQuery {
    /// `1` restricts the listing to attributes used by at least one recipe.
    #[param(example = "1")]
    pub assigned_only: Option<String>,
}

/// Body for creating a tag or ingredient.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateAttributeRequest {
    #[schema(example = "Vegan")]
    pub name: Option<String>,
}

/// Wire shape shared by tags and ingredients.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AttributeResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Attribute> for AttributeResponse {
    fn from(attribute: &Attribute) -> Self {
        Self {
            id: attribute.id().get(),
            name: attribute.name().as_ref().to_owned(),
        }
    }
}

async fn list_attributes(
    kind: AttributeKind,
    state: &HttpState,
    session: &SessionContext,
    query: AttributeListQuery,
) -> ApiResult<web::Json<Vec<AttributeResponse>>> {
    let owner = session.require_user_id()?;
    let assigned_only = parse_bool_flag(query.assigned_only.as_deref(), ASSIGNED_ONLY_FIELD)?;
    let attributes = state
        .attributes_query
        .list(&owner, kind, assigned_only)
        .await?;
    Ok(web::Json(attributes.iter().map(AttributeResponse::from).collect()))
}

async fn create_attribute(
    kind: AttributeKind,
    state: &HttpState,
    session: &SessionContext,
    payload: CreateAttributeRequest,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let name = payload.name.ok_or_else(|| missing_field_error(NAME_FIELD))?;
    let attribute = state.attributes.create(&owner, kind, &name).await?;
    Ok(HttpResponse::Created().json(AttributeResponse::from(&attribute)))
}

/// The caller's tags, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    params(AttributeListQuery),
    responses(
        (status = 200, description = "Tags", body = [AttributeResponse]),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["attributes"],
    operation_id = "listTags"
)]
#[get("/tags")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AttributeListQuery>,
) -> ApiResult<web::Json<Vec<AttributeResponse>>> {
    list_attributes(AttributeKind::Tag, &state, &session, query.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = CreateAttributeRequest,
    responses(
        (status = 201, description = "Tag created", body = AttributeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["attributes"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAttributeRequest>,
) -> ApiResult<HttpResponse> {
    create_attribute(AttributeKind::Tag, &state, &session, payload.into_inner()).await
}

/// The caller's ingredients, name descending.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(AttributeListQuery),
    responses(
        (status = 200, description = "Ingredients", body = [AttributeResponse]),
        (status = 400, description = "Invalid query", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["attributes"],
    operation_id = "listIngredients"
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<AttributeListQuery>,
) -> ApiResult<web::Json<Vec<AttributeResponse>>> {
    list_attributes(AttributeKind::Ingredient, &state, &session, query.into_inner()).await
}

#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = CreateAttributeRequest,
    responses(
        (status = 201, description = "Ingredient created", body = AttributeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["attributes"],
    operation_id = "createIngredient"
)]
#[post("/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateAttributeRequest>,
) -> ApiResult<HttpResponse> {
    create_attribute(
        AttributeKind::Ingredient,
        &state,
        &session,
        payload.into_inner(),
    )
    .await
}
