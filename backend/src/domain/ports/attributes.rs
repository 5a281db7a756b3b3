//! Driving ports for tags and ingredients.

use async_trait::async_trait;

use crate::domain::{Attribute, AttributeKind, Error, UserId};

/// Create tags and ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeCommand: Send + Sync {
    /// Create an attribute of `kind` named `name` for `owner`.
    async fn create(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        name: &str,
    ) -> Result<Attribute, Error>;
}

/// List tags and ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttributeQuery: Send + Sync {
    /// The owner's attributes of `kind`, name descending.
    async fn list(
        &self,
        owner: &UserId,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, Error>;
}
