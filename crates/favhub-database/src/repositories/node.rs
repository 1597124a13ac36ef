//! Read-only node lookups.
//!
//! Handles are selected as `BIGINT` whatever the node store's key type.

use sqlx::PgPool;

use favhub_core::error::{AppError, ErrorKind};
use favhub_core::result::AppResult;
use favhub_core::types::NodeId;
use favhub_entity::node::Node;

/// Repository for reading the node store.
#[derive(Debug, Clone)]
pub struct NodeRepository {
    pool: PgPool,
}

impl NodeRepository {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a node by its numeric handle.
    pub async fn find_by_id(&self, id: NodeId) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(
            "SELECT nodeid::BIGINT AS nodeid, owner, path, isdir, mimetype, deleted FROM nodes \
             WHERE nodeid = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    /// Find the live (non-deleted) node at `path`.
    pub async fn find_by_path(&self, path: &str) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(
            "SELECT nodeid::BIGINT AS nodeid, owner, path, isdir, mimetype, deleted FROM nodes \
             WHERE path = $1 AND NOT deleted",
        )
        .bind(path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find node by path", e)
        })
    }
}
