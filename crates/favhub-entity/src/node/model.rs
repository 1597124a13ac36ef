//! Node entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use favhub_core::types::NodeId;

/// A path-addressed resource (file or directory) in the node store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Node {
    /// Numeric node handle.
    #[sqlx(rename = "nodeid")]
    pub id: NodeId,
    /// Name of the owning user (or group).
    pub owner: String,
    /// Full slash-delimited path, unique among non-deleted nodes.
    pub path: String,
    /// Whether this node is a directory.
    #[sqlx(rename = "isdir")]
    pub is_dir: bool,
    /// MIME type of the node content.
    #[sqlx(rename = "mimetype")]
    pub mime_type: String,
    /// Soft-delete flag.
    pub deleted: bool,
}

impl Node {
    /// Whether `other` lies strictly below this node in the path hierarchy.
    ///
    /// Only directories have descendants. The root path `/` contains every
    /// other absolute path.
    pub fn contains(&self, other: &Node) -> bool {
        if !self.is_dir || self.id == other.id {
            return false;
        }
        let prefix = self.path.trim_end_matches('/');
        other
            .path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/') && rest.len() > 1)
    }

    /// Final path segment, or `/` for the root.
    pub fn name(&self) -> &str {
        self.path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("/")
    }
}
