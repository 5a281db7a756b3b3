//! PostgreSQL-backed [`AttributeRepository`] for tags and ingredients.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{AttributeRepository, AttributeRepositoryError};
use crate::domain::{Attribute, AttributeId, AttributeKind, AttributeName, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{AttributeRow, NewAttributeRow};
use super::pool::DbPool;
use super::schema::{attributes, recipe_attributes};

/// Diesel implementation of the attribute repository port.
#[derive(Clone)]
pub struct DieselAttributeRepository {
    pool: DbPool,
}

impl DieselAttributeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> AttributeRepositoryError {
    map_diesel_error(
        error,
        AttributeRepositoryError::query,
        AttributeRepositoryError::connection,
    )
}

/// Why a stored attribute row could not become a domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(super) enum AttributeRowError {
    #[error("attribute {id} has unknown kind {kind:?}")]
    UnknownKind { id: i64, kind: String },
    #[error("attribute {id} has an invalid name")]
    InvalidName { id: i64 },
}

pub(super) fn row_to_attribute(row: AttributeRow) -> Result<Attribute, AttributeRowError> {
    let kind = AttributeKind::from_storage(&row.kind).ok_or_else(|| {
        AttributeRowError::UnknownKind {
            id: row.id,
            kind: row.kind.clone(),
        }
    })?;
    let name =
        AttributeName::new(&row.name).map_err(|_| AttributeRowError::InvalidName { id: row.id })?;
    Ok(Attribute::new(
        AttributeId::new(row.id),
        UserId::from_uuid(row.user_id),
        kind,
        name,
    ))
}

fn convert_rows(rows: Vec<AttributeRow>) -> Result<Vec<Attribute>, AttributeRepositoryError> {
    rows.into_iter()
        .map(|row| {
            row_to_attribute(row).map_err(|err| {
                warn!(%err, "stored attribute failed validation");
                AttributeRepositoryError::query(err.to_string())
            })
        })
        .collect()
}

#[async_trait]
impl AttributeRepository for DieselAttributeRepository {
    async fn create(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        name: &AttributeName,
    ) -> Result<Attribute, AttributeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AttributeRepositoryError::connection))?;
        let row = NewAttributeRow {
            user_id: *owner.as_uuid(),
            kind: kind.as_str(),
            name: name.as_ref(),
        };
        let stored: AttributeRow = diesel::insert_into(attributes::table)
            .values(&row)
            .returning(AttributeRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_error)?;
        convert_rows(vec![stored])?
            .pop()
            .ok_or_else(|| AttributeRepositoryError::query("insert returned no row"))
    }

    async fn list(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AttributeRepositoryError::connection))?;
        let mut query = attributes::table
            .filter(attributes::user_id.eq(owner.as_uuid()))
            .filter(attributes::kind.eq(kind.as_str()))
            .select(AttributeRow::as_select())
            .order((attributes::name.desc(), attributes::id.desc()))
            .into_boxed();
        if assigned_only {
            // IN (subquery) yields each attribute once however many links it has.
            query = query.filter(
                attributes::id.eq_any(recipe_attributes::table.select(recipe_attributes::attribute_id)),
            );
        }
        let rows: Vec<AttributeRow> = query.load(&mut conn).await.map_err(map_error)?;
        convert_rows(rows)
    }

    async fn find_many(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        ids: &[AttributeId],
    ) -> Result<Vec<Attribute>, AttributeRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, AttributeRepositoryError::connection))?;
        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<AttributeRow> = attributes::table
            .filter(attributes::user_id.eq(owner.as_uuid()))
            .filter(attributes::kind.eq(kind.as_str()))
            .filter(attributes::id.eq_any(raw_ids))
            .select(AttributeRow::as_select())
            .order(attributes::id.asc())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        convert_rows(rows)
    }
}
