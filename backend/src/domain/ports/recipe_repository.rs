//! Port for recipe storage.
//!
//! Every method is scoped to the owning user; a recipe that belongs to
//! someone else behaves exactly like one that does not exist.

use async_trait::async_trait;

use crate::domain::{Recipe, RecipeDraft, RecipeFilter, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Store a recipe and its tag/ingredient links atomically.
    ///
    /// Callers must have checked that the draft's attribute ids belong to
    /// `owner`.
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// The owner's recipes matching `filter`, newest id first.
    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// Fetch one of the owner's recipes.
    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Overwrite a recipe and replace its link sets atomically.
    ///
    /// Returns `None` when no such recipe belongs to `owner`.
    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete a recipe and its links. Returns whether a row was removed.
    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;
}
