//! Wire domain services onto the configured store.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use recipe_backend::domain::ports::{AttributeRepository, RecipeRepository, UserRepository};
use recipe_backend::domain::{AccountService, AttributeService, RecipeService};
use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_backend::outbound::memory::InMemoryStore;
use recipe_backend::outbound::persistence::{
    DieselAttributeRepository, DieselRecipeRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the services over one set of repositories.
fn services<U, A, R>(users: Arc<U>, attributes: Arc<A>, recipes: Arc<R>) -> HttpState
where
    U: UserRepository + 'static,
    A: AttributeRepository + 'static,
    R: RecipeRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(users));
    let attribute_service = Arc::new(AttributeService::new(attributes.clone()));
    let recipe_service = Arc::new(RecipeService::new(recipes, attributes));
    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        profile: accounts.clone(),
        login: accounts,
        attributes: attribute_service.clone(),
        attributes_query: attribute_service,
        recipes: recipe_service.clone(),
        recipes_query: recipe_service,
    })
}

/// PostgreSQL-backed state when a pool is configured, in-memory otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => services(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselAttributeRepository::new(pool.clone())),
            Arc::new(DieselRecipeRepository::new(pool.clone())),
        ),
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            let store = Arc::new(InMemoryStore::new());
            services(store.clone(), store.clone(), store)
        }
    };
    web::Data::new(state)
}
