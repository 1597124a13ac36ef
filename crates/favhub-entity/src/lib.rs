//! # favhub-entity
//!
//! Domain entity models for the node store, the share registry, and the
//! favorite index. These map 1:1 to database tables and derive `sqlx::FromRow`
//! where rows are read directly.

pub mod favorite;
pub mod node;
pub mod share;
