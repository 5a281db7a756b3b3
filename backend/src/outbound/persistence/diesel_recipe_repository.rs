//! PostgreSQL-backed [`RecipeRepository`].
//!
//! Recipe rows live in `recipes`; their tags and ingredients are rows of
//! `recipe_attributes`. Writes that touch both tables run in one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    AttributeKind, Price, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipeLink, RecipeParts,
    RecipeTitle, TimeMinutes, UserId,
};

use super::diesel_attribute_repository::row_to_attribute;
use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AttributeRow, NewRecipeRow, RecipeAttributeRow, RecipeRow, RecipeUpdate};
use super::pool::DbPool;
use super::schema::{attributes, recipe_attributes, recipes};

/// Diesel implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(
        &self,
    ) -> Result<
        diesel_async::pooled_connection::bb8::PooledConnection<'_, AsyncPgConnection>,
        RecipeRepositoryError,
    > {
        self.pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, RecipeRepositoryError::connection))
    }
}

fn map_error(error: DieselError) -> RecipeRepositoryError {
    map_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn corrupt(recipe_id: i64, detail: impl std::fmt::Display) -> RecipeRepositoryError {
    warn!(recipe_id, %detail, "stored recipe failed validation");
    RecipeRepositoryError::query(format!("stored recipe {recipe_id} is invalid"))
}

/// Attribute rows linked to each of `recipe_ids`, ordered by attribute id.
async fn load_links(
    conn: &mut AsyncPgConnection,
    recipe_ids: &[i64],
) -> QueryResult<Vec<(i64, AttributeRow)>> {
    if recipe_ids.is_empty() {
        return Ok(Vec::new());
    }
    recipe_attributes::table
        .inner_join(attributes::table)
        .filter(recipe_attributes::recipe_id.eq_any(recipe_ids.to_vec()))
        .select((recipe_attributes::recipe_id, AttributeRow::as_select()))
        .order(attributes::id.asc())
        .load(conn)
        .await
}

/// Replace every link of `recipe_id` with the draft's tags and ingredients.
async fn replace_links(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    draft: &RecipeDraft,
) -> QueryResult<()> {
    diesel::delete(recipe_attributes::table.filter(recipe_attributes::recipe_id.eq(recipe_id)))
        .execute(conn)
        .await?;
    let rows: Vec<RecipeAttributeRow> = draft
        .tags
        .iter()
        .chain(&draft.ingredients)
        .map(|id| RecipeAttributeRow {
            recipe_id,
            attribute_id: id.get(),
        })
        .collect();
    if !rows.is_empty() {
        diesel::insert_into(recipe_attributes::table)
            .values(&rows)
            .execute(conn)
            .await?;
    }
    Ok(())
}

fn assemble(row: RecipeRow, links: Vec<AttributeRow>) -> Result<Recipe, RecipeRepositoryError> {
    let recipe_id = row.id;
    let mut tags = Vec::new();
    let mut ingredients = Vec::new();
    for link in links {
        let attribute = row_to_attribute(link).map_err(|err| corrupt(recipe_id, err))?;
        match attribute.kind() {
            AttributeKind::Tag => tags.push(attribute),
            AttributeKind::Ingredient => ingredients.push(attribute),
        }
    }
    Ok(Recipe::new(RecipeParts {
        id: RecipeId::new(recipe_id),
        owner: UserId::from_uuid(row.user_id),
        title: RecipeTitle::new(&row.title).map_err(|err| corrupt(recipe_id, err))?,
        time_minutes: TimeMinutes::new(i64::from(row.time_minutes))
            .map_err(|err| corrupt(recipe_id, err))?,
        price: Price::new(row.price).map_err(|err| corrupt(recipe_id, err))?,
        link: RecipeLink::new(&row.link).map_err(|err| corrupt(recipe_id, err))?,
        tags,
        ingredients,
    }))
}

fn assemble_all(
    rows: Vec<RecipeRow>,
    links: Vec<(i64, AttributeRow)>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    let mut grouped: HashMap<i64, Vec<AttributeRow>> = HashMap::new();
    for (recipe_id, link) in links {
        grouped.entry(recipe_id).or_default().push(link);
    }
    rows.into_iter()
        .map(|row| {
            let links = grouped.remove(&row.id).unwrap_or_default();
            assemble(row, links)
        })
        .collect()
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        owner: &UserId,
        draft: &RecipeDraft,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.connection().await?;
        let new_row = NewRecipeRow {
            user_id: *owner.as_uuid(),
            title: draft.title.as_ref(),
            time_minutes: draft.time_minutes.get(),
            price: draft.price.value(),
            link: draft.link.as_ref(),
        };
        let (row, links) = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let row: RecipeRow = diesel::insert_into(recipes::table)
                        .values(&new_row)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await?;
                    replace_links(conn, row.id, draft).await?;
                    let links = load_links(conn, &[row.id]).await?;
                    Ok((row, links))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;
        assemble(row, links.into_iter().map(|(_, link)| link).collect())
    }

    async fn list(
        &self,
        owner: &UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError> {
        let mut conn = self.connection().await?;
        let mut query = recipes::table
            .filter(recipes::user_id.eq(*owner.as_uuid()))
            .select(RecipeRow::as_select())
            .order(recipes::id.desc())
            .into_boxed();
        for (kind, wanted) in [
            (AttributeKind::Tag, &filter.tags),
            (AttributeKind::Ingredient, &filter.ingredients),
        ] {
            if wanted.is_empty() {
                continue;
            }
            let raw_ids: Vec<i64> = wanted.iter().map(|id| id.get()).collect();
            query = query.filter(
                recipes::id.eq_any(
                    recipe_attributes::table
                        .inner_join(attributes::table)
                        .filter(attributes::kind.eq(kind.as_str()))
                        .filter(recipe_attributes::attribute_id.eq_any(raw_ids))
                        .select(recipe_attributes::recipe_id),
                ),
            );
        }

        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_error)?;
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let links = load_links(&mut conn, &ids).await.map_err(map_error)?;
        assemble_all(rows, links)
    }

    async fn find(
        &self,
        owner: &UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.connection().await?;
        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id.get()))
            .filter(recipes::user_id.eq(*owner.as_uuid()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let links = load_links(&mut conn, &[row.id]).await.map_err(map_error)?;
        assemble(row, links.into_iter().map(|(_, link)| link).collect()).map(Some)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: RecipeId,
        draft: &RecipeDraft,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.connection().await?;
        let owner_id = *owner.as_uuid();
        let changes = RecipeUpdate {
            title: draft.title.as_ref(),
            time_minutes: draft.time_minutes.get(),
            price: draft.price.value(),
            link: draft.link.as_ref(),
            updated_at: Utc::now(),
        };
        let updated = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let row: Option<RecipeRow> = diesel::update(
                        recipes::table
                            .filter(recipes::id.eq(id.get()))
                            .filter(recipes::user_id.eq(owner_id)),
                    )
                    .set(&changes)
                    .returning(RecipeRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;
                    let Some(row) = row else {
                        return Ok(None);
                    };
                    replace_links(conn, row.id, draft).await?;
                    let links = load_links(conn, &[row.id]).await?;
                    Ok(Some((row, links)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_error)?;
        updated
            .map(|(row, links)| assemble(row, links.into_iter().map(|(_, link)| link).collect()))
            .transpose()
    }

    async fn delete(&self, owner: &UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.connection().await?;
        // Link rows go with the recipe through ON DELETE CASCADE.
        let removed = diesel::delete(
            recipes::table
                .filter(recipes::id.eq(id.get()))
                .filter(recipes::user_id.eq(*owner.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;
        Ok(removed > 0)
    }
}
