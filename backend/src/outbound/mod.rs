//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories built on Diesel.
//! - **memory**: a mutex-guarded store for tests and database-less runs.
//!
//! Adapters translate between domain values and storage representations and
//! contain no business rules.

pub mod memory;
pub mod persistence;
