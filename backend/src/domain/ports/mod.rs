//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by outbound adapters; driving
//! ports (`*Command`, `*Query`, [`LoginService`]) are implemented by domain
//! services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod accounts;
mod attribute_repository;
mod attributes;
mod recipe_repository;
mod recipes;
mod user_repository;

#[cfg(test)]
pub use accounts::{MockAccountCommand, MockLoginService, MockUserProfileQuery};
pub use accounts::{
    AccountCommand, CreateAccountRequest, LoginService, ProfileUpdate, UserProfileQuery,
};
#[cfg(test)]
pub use attribute_repository::MockAttributeRepository;
pub use attribute_repository::{AttributeRepository, AttributeRepositoryError};
#[cfg(test)]
pub use attributes::{MockAttributeCommand, MockAttributeQuery};
pub use attributes::{AttributeCommand, AttributeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use recipes::{MockRecipeCommand, MockRecipeQuery};
pub use recipes::{RecipeCommand, RecipeQuery, RecipeUpdate};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
