//! PostgreSQL-backed [`UserRepository`].

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, PasswordHash, User, UserFlags, UserId, UserName};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Rebuild a domain user, rejecting rows that no longer satisfy validation.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = Email::parse(&row.email).map_err(|err| {
        warn!(user_id = %row.id, %err, "stored email failed validation");
        UserPersistenceError::query("stored user email is invalid")
    })?;
    let name = UserName::new(&row.name).map_err(|err| {
        warn!(user_id = %row.id, %err, "stored name failed validation");
        UserPersistenceError::query("stored user name is invalid")
    })?;
    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        name,
        PasswordHash::from_stored(row.password_hash),
        UserFlags {
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        },
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let flags = user.flags();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: user.password_hash().as_str(),
            is_active: flags.is_active,
            is_staff: flags.is_staff,
            is_superuser: flags.is_superuser,
        };

        match diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                debug!("insert rejected by unique email constraint");
                Err(UserPersistenceError::duplicate_email(user.email().as_ref()))
            }
            Err(err) => Err(map_error(err)),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserPersistenceError::connection))?;
        let changes = UserUpdate {
            name: user.name().as_ref(),
            password_hash: user.password_hash().as_str(),
            updated_at: Utc::now(),
        };
        let updated = diesel::update(users::table.filter(users::id.eq(user.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        if updated == 0 {
            return Err(UserPersistenceError::query("user not found for update"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            name: "Cook".to_owned(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
            is_active: true,
            is_staff: true,
            is_superuser: false,
        }
    }

    #[rstest]
    fn rows_convert_to_users() {
        let source = row("cook@example.com");
        let id = source.id;

        let user = row_to_user(source).expect("valid row");

        assert_eq!(user.id().as_uuid(), &id);
        assert_eq!(user.email().as_ref(), "cook@example.com");
        assert!(user.is_staff());
        assert!(!user.is_superuser());
    }

    #[rstest]
    fn corrupt_rows_are_query_errors() {
        let err = row_to_user(row("not-an-email")).expect_err("invalid email");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
