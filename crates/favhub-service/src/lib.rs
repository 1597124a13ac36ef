//! # favhub-service
//!
//! Business logic for favorites: marking and unmarking nodes, and
//! aggregating the favorites a user can currently see through ownership,
//! personal shares, and group shares.

pub mod favorite;

pub use favorite::{FavoriteService, FavoriteStore, MemoryFavoriteStore};
