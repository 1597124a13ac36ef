//! # favhub-database
//!
//! PostgreSQL connection management, favorite index bootstrap, and the
//! repositories backing favorite mutation and visibility resolution.

pub mod connection;
pub mod repositories;
pub mod schema;

pub use connection::DatabasePool;
