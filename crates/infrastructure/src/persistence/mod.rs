//! Persistence module
//!
//! SQLite-based storage for customer profiles and their smart tags.

pub mod connection;
pub mod customer_profile_store;
pub mod migrations;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use customer_profile_store::SqliteCustomerProfileStore;
