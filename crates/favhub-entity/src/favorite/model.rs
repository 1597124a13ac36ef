//! Favorite entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use favhub_core::types::NodeId;

/// A user's marker on a node. At most one exists per (node, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    /// The favorited node.
    #[sqlx(rename = "nodeid")]
    pub node_id: NodeId,
    /// The user who favorited it.
    pub username: String,
}
