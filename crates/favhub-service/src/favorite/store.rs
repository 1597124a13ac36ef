//! Storage seam for favorite operations.

use async_trait::async_trait;

use favhub_core::result::AppResult;
use favhub_core::types::NodeId;
use favhub_database::repositories::FavoriteRepository;
use favhub_entity::favorite::VisibilityScope;
use favhub_entity::node::Node;

/// Backend for the favorite index and per-scope visibility resolution.
///
/// Implementations must report every storage failure, including unknown
/// paths, unknown users, and duplicate pairs on [`mark`](Self::mark), as
/// `ErrorKind::Database`. Absence is never an error.
#[async_trait]
pub trait FavoriteStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a (node at `path`, `user`) pair.
    async fn mark(&self, path: &str, user: &str) -> AppResult<()>;

    /// Delete the (node at `path`, `user`) pair if present.
    async fn unmark(&self, path: &str, user: &str) -> AppResult<()>;

    /// Whether the (`node_id`, `user`) pair exists.
    async fn is_marked(&self, node_id: NodeId, user: &str) -> AppResult<bool>;

    /// Nodes visible in `scope` that the scope's user has favorited, with no
    /// duplicate identities.
    async fn favorited_in_scope(
        &self,
        scope: &VisibilityScope,
        include_deleted: bool,
    ) -> AppResult<Vec<Node>>;
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    async fn mark(&self, path: &str, user: &str) -> AppResult<()> {
        self.insert_by_path(path, user).await
    }

    async fn unmark(&self, path: &str, user: &str) -> AppResult<()> {
        self.delete_by_path(path, user).await.map(|_| ())
    }

    async fn is_marked(&self, node_id: NodeId, user: &str) -> AppResult<bool> {
        self.exists(node_id, user).await
    }

    async fn favorited_in_scope(
        &self,
        scope: &VisibilityScope,
        include_deleted: bool,
    ) -> AppResult<Vec<Node>> {
        self.find_favorited_in_scope(scope, include_deleted).await
    }
}
