//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on driving
//! ports, so they can be exercised with mocks or the in-memory store.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AttributeCommand, AttributeQuery, LoginService, RecipeCommand, RecipeQuery,
    UserProfileQuery,
};

/// Parameter object bundling the port implementations handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub login: Arc<dyn LoginService>,
    pub attributes: Arc<dyn AttributeCommand>,
    pub attributes_query: Arc<dyn AttributeQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub login: Arc<dyn LoginService>,
    pub attributes: Arc<dyn AttributeCommand>,
    pub attributes_query: Arc<dyn AttributeQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use recipe_backend::domain::{AccountService, AttributeService, RecipeService};
    /// use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use recipe_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::default());
    /// let accounts = Arc::new(AccountService::new(store.clone()));
    /// let attributes = Arc::new(AttributeService::new(store.clone()));
    /// let recipes = Arc::new(RecipeService::new(store.clone(), store));
    /// let state = HttpState::new(HttpStatePorts {
    ///     accounts: accounts.clone(),
    ///     profile: accounts.clone(),
    ///     login: accounts,
    ///     attributes: attributes.clone(),
    ///     attributes_query: attributes,
    ///     recipes: recipes.clone(),
    ///     recipes_query: recipes,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            profile,
            login,
            attributes,
            attributes_query,
            recipes,
            recipes_query,
        } = ports;
        Self {
            accounts,
            profile,
            login,
            attributes,
            attributes_query,
            recipes,
            recipes_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
