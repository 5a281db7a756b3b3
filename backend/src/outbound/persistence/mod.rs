//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories share a [`DbPool`] of `diesel-async` connections. Row structs
//! (`models.rs`) and table definitions (`schema.rs`) stay private; every
//! repository converts rows into domain values and maps database failures
//! onto its port error.
//!
//! # Example
//!
//! ```no_run
//! use recipe_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! # let _ = recipes;
//! # Ok(())
//! # }
//! ```

mod diesel_attribute_repository;
mod diesel_error_mapping;
mod diesel_recipe_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attribute_repository::DieselAttributeRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
