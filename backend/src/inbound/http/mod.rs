//! HTTP inbound adapter exposing the REST endpoints.

pub mod attributes;
pub mod error;
pub mod health;
pub mod recipes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` handler and the extractor error handlers.
///
/// Mount inside the versioned scope:
///
/// ```
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::configure;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::create_user)
        .service(users::login)
        .service(users::logout)
        .service(users::current_user)
        .service(users::update_current_user)
        .service(attributes::list_tags)
        .service(attributes::create_tag)
        .service(attributes::list_ingredients)
        .service(attributes::create_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::get_recipe)
        .service(recipes::patch_recipe)
        .service(recipes::replace_recipe)
        .service(recipes::delete_recipe);
}
