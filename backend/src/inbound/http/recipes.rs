//! Recipe handlers.
//!
//! ```text
//! GET    /api/v1/recipes?tags=1,2&ingredients=3
//! POST   /api/v1/recipes      {"title":"Soup","time_minutes":10,"price":"5.00","tags":[1]}
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id} {"title":"Stew"}
//! PUT    /api/v1/recipes/{id} {"title":"Stew","time_minutes":25,"price":4.5}
//! DELETE /api/v1/recipes/{id}
//! ```
//!
//! Lists and the create response carry relation ids; the detail, PATCH and
//! PUT responses nest `{id, name}` objects.

use std::str::FromStr;

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::ports::RecipeUpdate;
use crate::domain::{Attribute, AttributeId, Error, Recipe, RecipeFields, RecipeFilter, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::attributes::AttributeResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_price_error, parse_id_list};

const PRICE_FIELD: FieldName = FieldName::new("price");
const TAGS_FIELD: FieldName = FieldName::new("tags");
const INGREDIENTS_FIELD: FieldName = FieldName::new("ingredients");

/// Filters for `GET /api/v1/recipes`; each is a comma-separated id list.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    #[param(example = "1,2")]
    pub tags: Option<String>,
    #[param(example = "3")]
    pub ingredients: Option<String>,
}

impl RecipeListQuery {
    fn into_filter(self) -> Result<RecipeFilter, Error> {
        Ok(RecipeFilter {
            tags: parse_id_list(self.tags.as_deref(), TAGS_FIELD)?,
            ingredients: parse_id_list(self.ingredients.as_deref(), INGREDIENTS_FIELD)?,
        })
    }
}

/// Body for create, PATCH and PUT. Omitted fields are `None`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeRequest {
    #[schema(example = "Tomato soup")]
    pub title: Option<String>,
    #[schema(example = 25)]
    pub time_minutes: Option<i64>,
    /// A JSON number or a decimal string such as `"5.00"`.
    #[schema(value_type = Option<String>, example = "5.00")]
    pub price: Option<Value>,
    pub link: Option<String>,
    pub tags: Option<Vec<i64>>,
    pub ingredients: Option<Vec<i64>>,
}

fn parse_price(raw: &Value) -> Result<Decimal, Error> {
    let text = match raw {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_owned(),
        other => return Err(invalid_price_error(PRICE_FIELD, &other.to_string())),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid_price_error(PRICE_FIELD, &text))
}

fn to_ids(raw: Option<Vec<i64>>) -> Option<Vec<AttributeId>> {
    raw.map(|ids| ids.into_iter().map(AttributeId::new).collect())
}

impl TryFrom<RecipeRequest> for RecipeFields {
    type Error = Error;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title,
            time_minutes: value.time_minutes,
            price: value.price.as_ref().map(parse_price).transpose()?,
            link: value.link,
            tags: to_ids(value.tags),
            ingredients: to_ids(value.ingredients),
        })
    }
}

/// List representation: relations as id arrays.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    #[schema(example = "5.00")]
    pub price: String,
    pub link: String,
    pub tags: Vec<i64>,
    pub ingredients: Vec<i64>,
}

fn ids(attributes: &[Attribute]) -> Vec<i64> {
    attributes.iter().map(|attribute| attribute.id().get()).collect()
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().get(),
            title: recipe.title().as_ref().to_owned(),
            time_minutes: recipe.time_minutes().get(),
            price: recipe.price().to_string(),
            link: recipe.link().as_ref().to_owned(),
            tags: ids(recipe.tags()),
            ingredients: ids(recipe.ingredients()),
        }
    }
}

/// Detail representation: relations as `{id, name}` objects.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RecipeDetailResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i32,
    #[schema(example = "5.00")]
    pub price: String,
    pub link: String,
    pub tags: Vec<AttributeResponse>,
    pub ingredients: Vec<AttributeResponse>,
}

impl From<&Recipe> for RecipeDetailResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().get(),
            title: recipe.title().as_ref().to_owned(),
            time_minutes: recipe.time_minutes().get(),
            price: recipe.price().to_string(),
            link: recipe.link().as_ref().to_owned(),
            tags: recipe.tags().iter().map(AttributeResponse::from).collect(),
            ingredients: recipe
                .ingredients()
                .iter()
                .map(AttributeResponse::from)
                .collect(),
        }
    }
}

/// The caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let owner = session.require_user_id()?;
    let filter = query.into_inner().into_filter()?;
    let recipes = state.recipes_query.list(&owner, &filter).await?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    let fields = RecipeFields::try_from(payload.into_inner())?;
    let recipe = state.recipes.create(&owner, fields).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let owner = session.require_user_id()?;
    let recipe = state
        .recipes_query
        .get(&owner, RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(RecipeDetailResponse::from(&recipe)))
}

async fn apply_update(
    state: &HttpState,
    session: &SessionContext,
    id: i64,
    payload: RecipeRequest,
    wrap: fn(RecipeFields) -> RecipeUpdate,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let owner = session.require_user_id()?;
    let fields = RecipeFields::try_from(payload)?;
    let recipe = state
        .recipes
        .update(&owner, RecipeId::new(id), wrap(fields))
        .await?;
    Ok(web::Json(RecipeDetailResponse::from(&recipe)))
}

/// Change only the supplied fields.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeDetailResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    apply_update(
        &state,
        &session,
        path.into_inner(),
        payload.into_inner(),
        RecipeUpdate::Partial,
    )
    .await
}

/// Replace the recipe; omitted optional fields are reset.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Replaced recipe", body = RecipeDetailResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipes/{id}")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    apply_update(
        &state,
        &session,
        path.into_inner(),
        payload.into_inner(),
        RecipeUpdate::Full,
    )
    .await
}

#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let owner = session.require_user_id()?;
    state
        .recipes
        .delete(&owner, RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
