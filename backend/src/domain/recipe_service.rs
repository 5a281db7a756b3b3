//! Recipe services.
//!
//! Besides field validation, every write checks that the referenced tags and
//! ingredients exist and belong to the caller before anything is stored.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::attribute_service::map_attribute_error;
use crate::domain::ports::{
    AttributeRepository, RecipeCommand, RecipeQuery, RecipeRepository, RecipeRepositoryError,
    RecipeUpdate,
};
use crate::domain::{
    AttributeId, AttributeKind, Error, Recipe, RecipeDraft, RecipeFields, RecipeFilter, RecipeId,
    RecipePatch, RecipeValidationError, UserId,
};

const RECIPE_NOT_FOUND: &str = "recipe not found";

/// Implements the recipe driving ports.
#[derive(Clone)]
pub struct RecipeService<R, A> {
    recipes: Arc<R>,
    attributes: Arc<A>,
}

impl<R, A> RecipeService<R, A> {
    pub fn new(recipes: Arc<R>, attributes: Arc<A>) -> Self {
        Self {
            recipes,
            attributes,
        }
    }
}

fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn map_validation_error(error: RecipeValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": error.field(),
        "code": error.code(),
    }))
}

fn unknown_ids_error(kind: AttributeKind, missing: &[AttributeId]) -> Error {
    let field = kind.field_name();
    Error::invalid_request(format!("{field} contains unknown ids")).with_details(json!({
        "field": field,
        "code": "unknown_ids",
        "ids": missing.iter().map(|id| id.get()).collect::<Vec<_>>(),
    }))
}

impl<R, A> RecipeService<R, A>
where
    R: RecipeRepository,
    A: AttributeRepository,
{
    async fn find_existing(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(RECIPE_NOT_FOUND))
    }

    /// Reject ids that do not name one of the owner's attributes of `kind`.
    async fn ensure_owned(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        ids: &[AttributeId],
    ) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self
            .attributes
            .find_many(owner, kind, ids)
            .await
            .map_err(map_attribute_error)?;
        let missing: Vec<AttributeId> = ids
            .iter()
            .copied()
            .filter(|id| !found.iter().any(|attribute| attribute.id() == *id))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            debug!(%kind, ?missing, "rejected attribute ids");
            Err(unknown_ids_error(kind, &missing))
        }
    }

    async fn ensure_draft_owned(&self, owner: &UserId, draft: &RecipeDraft) -> Result<(), Error> {
        for kind in [AttributeKind::Tag, AttributeKind::Ingredient] {
            self.ensure_owned(owner, kind, draft.attribute_ids(kind))
                .await?;
        }
        Ok(())
    }

    async fn write(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, Error> {
        self.recipes
            .update(owner, id, draft)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| Error::not_found(RECIPE_NOT_FOUND))
    }
}

#[async_trait]
impl<R, A> RecipeCommand for RecipeService<R, A>
where
    R: RecipeRepository,
    A: AttributeRepository,
{
    async fn create(&self, owner: &UserId, fields: RecipeFields) -> Result<Recipe, Error> {
        let draft = RecipeDraft::try_from_fields(fields).map_err(map_validation_error)?;
        self.ensure_draft_owned(owner, &draft).await?;
        self.recipes
            .create(owner, &draft)
            .await
            .map_err(map_recipe_error)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        update: RecipeUpdate,
    ) -> Result<Recipe, Error> {
        let current = self.find_existing(owner, id).await?;
        let draft = match update {
            RecipeUpdate::Full(fields) => {
                let draft = RecipeDraft::try_from_fields(fields).map_err(map_validation_error)?;
                self.ensure_draft_owned(owner, &draft).await?;
                draft
            }
            RecipeUpdate::Partial(fields) => {
                let patch = RecipePatch::try_from_fields(fields).map_err(map_validation_error)?;
                for kind in [AttributeKind::Tag, AttributeKind::Ingredient] {
                    if let Some(ids) = patch.attribute_ids(kind) {
                        self.ensure_owned(owner, kind, ids).await?;
                    }
                }
                patch.apply_to(&current)
            }
        };
        self.write(owner, id, &draft).await
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<(), Error> {
        let removed = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(RECIPE_NOT_FOUND))
        }
    }
}

#[async_trait]
impl<R, A> RecipeQuery for RecipeService<R, A>
where
    R: RecipeRepository,
    A: AttributeRepository,
{
    async fn list(&self, owner: &UserId, filter: &RecipeFilter) -> Result<Vec<Recipe>, Error> {
        self.recipes
            .list(owner, filter)
            .await
            .map_err(map_recipe_error)
    }

    async fn get(&self, owner: &UserId, id: RecipeId) -> Result<Recipe, Error> {
        self.find_existing(owner, id).await
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
