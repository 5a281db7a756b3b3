//! Port for tag and ingredient storage.

use async_trait::async_trait;

use crate::domain::{Attribute, AttributeId, AttributeKind, AttributeName, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attribute repository adapters.
    pub enum AttributeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "attribute repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "attribute repository query failed: {message}",
    }
}

/// Storage for tags and ingredients, always scoped to an owning user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeRepository: Send + Sync {
    /// Store a new attribute and return it with its assigned id.
    async fn create(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        name: &AttributeName,
    ) -> Result<Attribute, AttributeRepositoryError>;

    /// List the owner's attributes of `kind`, name descending.
    ///
    /// With `assigned_only`, only attributes linked to at least one recipe
    /// are returned, each once.
    async fn list(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributeRepositoryError>;

    /// Return those of `ids` that exist, belong to `owner` and are of `kind`.
    async fn find_many(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        ids: &[AttributeId],
    ) -> Result<Vec<Attribute>, AttributeRepositoryError>;
}
