//! Repository implementations for FavHub entities.

pub mod favorite;
pub mod node;

pub use favorite::FavoriteRepository;
pub use node::NodeRepository;
