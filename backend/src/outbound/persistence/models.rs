//! Internal Diesel row structs.
//!
//! These types never leave the persistence layer; repositories convert them
//! into domain values before returning.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::schema::{attributes, recipe_attributes, recipes, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Changes permitted on an existing account.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub password_hash: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attributes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttributeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub kind: String,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attributes)]
pub(crate) struct NewAttributeRow<'a> {
    pub user_id: Uuid,
    pub kind: &'a str,
    pub name: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub user_id: Uuid,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub user_id: Uuid,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: &'a str,
}

/// Full overwrite of a recipe's scalar columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: &'a str,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_attributes)]
pub(crate) struct RecipeAttributeRow {
    pub recipe_id: i64,
    pub attribute_id: i64,
}
