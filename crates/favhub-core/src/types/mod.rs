//! Core type definitions used across the FavHub workspace.

pub mod id;

pub use id::NodeId;
