//! Favorite domain entities.

pub mod model;
pub mod scope;

pub use model::Favorite;
pub use scope::VisibilityScope;
