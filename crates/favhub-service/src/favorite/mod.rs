//! Favorite services.

pub mod memory;
pub mod merge;
pub mod service;
pub mod store;

pub use memory::MemoryFavoriteStore;
pub use merge::FavoriteMerger;
pub use service::FavoriteService;
pub use store::FavoriteStore;
