//! Driving ports for recipe use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Recipe, RecipeFields, RecipeFilter, RecipeId, UserId};

/// How an update treats fields the client left out.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeUpdate {
    /// Only the supplied fields change (`PATCH`).
    Partial(RecipeFields),
    /// Required fields must be supplied; omitted optional fields are reset
    /// (`PUT`).
    Full(RecipeFields),
}

/// Create, change and delete recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe for `owner`.
    async fn create(&self, owner: &UserId, fields: RecipeFields) -> Result<Recipe, Error>;

    /// Update one of the owner's recipes.
    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        update: RecipeUpdate,
    ) -> Result<Recipe, Error>;

    /// Delete one of the owner's recipes.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error>;
}

/// Read recipes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// The owner's recipes matching `filter`, newest first.
    async fn list(&self, owner: &UserId, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error>;

    /// One of the owner's recipes.
    async fn get(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error>;
}
