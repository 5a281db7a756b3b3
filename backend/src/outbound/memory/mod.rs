//! In-memory implementation of the storage ports.
//!
//! Used by the test suites and by local runs without a database. One mutex
//! guards the whole state and every operation completes under a single lock,
//! so recipe writes and their link sets change together.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    AttributeRepository, AttributeRepositoryError, RecipeRepository, RecipeRepositoryError,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    Attribute, AttributeId, AttributeKind, AttributeName, Email, Recipe, RecipeDraft,
    RecipeFilter, RecipeId, User, UserId, sort_for_listing,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct StoredRecipe {
    owner: UserId,
    draft: RecipeDraft,
}

#[derive(Debug, Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    attributes: BTreeMap<AttributeId, Attribute>,
    recipes: BTreeMap<RecipeId, StoredRecipe>,
    last_attribute_id: i64,
    last_recipe_id: i64,
}

impl MemoryState {
    fn resolve(&self, owner: &UserId, kind: AttributeKind, ids: &[AttributeId]) -> Vec<Attribute> {
        ids.iter()
            .filter_map(|id| self.attributes.get(id))
            .filter(|attribute| attribute.owner() == owner && attribute.kind() == kind)
            .cloned()
            .collect()
    }

    fn materialise(&self, id: RecipeId, stored: &StoredRecipe) -> Recipe {
        let tags = self.resolve(&stored.owner, AttributeKind::Tag, &stored.draft.tags);
        let ingredients = self.resolve(
            &stored.owner,
            AttributeKind::Ingredient,
            &stored.draft.ingredients,
        );
        Recipe::from_draft(id, stored.owner, stored.draft.clone(), tags, ingredients)
    }

    fn owned_recipe(&self, owner: &UserId, id: RecipeId) -> Option<&StoredRecipe> {
        self.recipes
            .get(&id)
            .filter(|stored| &stored.owner == owner)
    }

    fn is_assigned(&self, id: AttributeId, kind: AttributeKind) -> bool {
        self.recipes
            .values()
            .any(|stored| stored.draft.attribute_ids(kind).contains(&id))
    }
}

/// Thread-safe in-memory store implementing every repository port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, &'static str> {
        self.state.lock().map_err(|_| {
            warn!("{POISONED}");
            POISONED
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        if state
            .users
            .values()
            .any(|existing| existing.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock().map_err(UserPersistenceError::query)?;
        Ok(state
            .users
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut state = self.lock().map_err(UserPersistenceError::query)?;
        match state.users.get_mut(user.id()) {
            Some(slot) => {
                *slot = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query("user not found for update")),
        }
    }
}

#[async_trait]
impl AttributeRepository for InMemoryStore {
    async fn create(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        name: &AttributeName,
    ) -> Result<Attribute, AttributeRepositoryError> {
        let mut state = self.lock().map_err(AttributeRepositoryError::query)?;
        state.last_attribute_id += 1;
        let id = AttributeId::new(state.last_attribute_id);
        let attribute = Attribute::new(id, *owner, kind, name.clone());
        state.attributes.insert(id, attribute.clone());
        Ok(attribute)
    }

    async fn list(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let state = self.lock().map_err(AttributeRepositoryError::query)?;
        let mut listed: Vec<Attribute> = state
            .attributes
            .values()
            .filter(|attribute| attribute.owner() == owner && attribute.kind() == kind)
            .filter(|attribute| !assigned_only || state.is_assigned(attribute.id(), kind))
            .cloned()
            .collect();
        sort_for_listing(&mut listed);
        Ok(listed)
    }

    async fn find_many(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        ids: &[AttributeId],
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let state = self.lock().map_err(AttributeRepositoryError::query)?;
        Ok(state.resolve(owner, kind, ids))
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        state.last_recipe_id += 1;
        let id = RecipeId::new(state.last_recipe_id);
        let stored = StoredRecipe {
            owner: *owner,
            draft: draft.clone(),
        };
        let recipe = state.materialise(id, &stored);
        state.recipes.insert(id, stored);
        Ok(recipe)
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        Ok(state
            .recipes
            .iter()
            .rev()
            .filter(|(_, stored)| &stored.owner == owner)
            .map(|(id, stored)| state.materialise(*id, stored))
            .filter(|recipe| filter.matches(recipe))
            .collect())
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock().map_err(RecipeRepositoryError::query)?;
        Ok(state
            .owned_recipe(owner, id)
            .map(|stored| state.materialise(id, stored)))
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        if state.owned_recipe(owner, id).is_none() {
            return Ok(None);
        }
        let stored = StoredRecipe {
            owner: *owner,
            draft: draft.clone(),
        };
        let recipe = state.materialise(id, &stored);
        state.recipes.insert(id, stored);
        Ok(Some(recipe))
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock().map_err(RecipeRepositoryError::query)?;
        if state.owned_recipe(owner, id).is_none() {
            return Ok(false);
        }
        Ok(state.recipes.remove(&id).is_some())
    }
}
