//! Favorite repository implementation.
//!
//! Referential checks are left to the database: an unknown path, an unknown
//! user, and a duplicate pair all surface as the same persistence error.

use sqlx::PgPool;
use tracing::{debug, error};

use favhub_core::error::{AppError, ErrorKind};
use favhub_core::result::AppResult;
use favhub_core::types::NodeId;
use favhub_entity::favorite::{Favorite, VisibilityScope};
use favhub_entity::node::Node;

/// Favorited nodes visible in one scope.
///
/// `$1`/`$2` are the share target kind and name, `$2` doubles as the owning
/// principal, `$3` is the user whose favorites filter the result and `$4`
/// decides whether soft-deleted nodes are kept. Descendants match on the
/// shared directory's path followed by `/`, so `/shared2` is never treated
/// as part of `/shared`. A soft-deleted shared directory still exposes its
/// subtree; only deleting the row or revoking the share hides it.
///
/// Ownership compares the bare `owner` name with the scope principal, so a
/// group scope also sees nodes owned by a user of the same name.
///
/// `nodeid` is widened to `BIGINT` so node stores keyed by `INTEGER` decode.
const FAVORITED_IN_SCOPE: &str = "\
SELECT n.nodeid::BIGINT AS nodeid, n.owner, n.path, n.isdir, n.mimetype, n.deleted \
FROM nodes n \
WHERE n.nodeid IN ( \
    SELECT s.nodeid FROM shares s \
    WHERE s.target_kind = $1 AND s.target_name = $2 \
    UNION \
    SELECT d.nodeid FROM shares s \
    JOIN nodes sn ON sn.nodeid = s.nodeid AND sn.isdir \
    JOIN nodes d ON starts_with(d.path, rtrim(sn.path, '/') || '/') \
    WHERE s.target_kind = $1 AND s.target_name = $2 \
    UNION \
    SELECT o.nodeid FROM nodes o WHERE o.owner = $2 \
) \
AND n.nodeid IN (SELECT f.nodeid FROM favorites f WHERE f.username = $3) \
AND ($4 OR NOT n.deleted) \
ORDER BY n.path ASC, n.nodeid ASC";

/// Repository for the favorite index and favorite visibility queries.
#[derive(Debug, Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    /// Create a new favorite repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Mark the live node at `path` as a favorite of `user`.
    pub async fn insert_by_path(&self, path: &str, user: &str) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO favorites (nodeid, username) VALUES ( \
             (SELECT nodeid FROM nodes WHERE path = $1 AND NOT deleted), $2)",
        )
        .bind(path)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(path, user, error = %e, "Failed to mark node as favorite");
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to mark node at '{path}' as favorite for '{user}'"),
                e,
            )
        })?;
        Ok(())
    }

    /// Remove any favorite of `user` on nodes at `path`. Returns rows removed.
    pub async fn delete_by_path(&self, path: &str, user: &str) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM favorites WHERE username = $2 AND nodeid IN ( \
             SELECT nodeid FROM nodes WHERE path = $1)",
        )
        .bind(path)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(path, user, error = %e, "Failed to unmark favorite");
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to unmark node at '{path}' as favorite for '{user}'"),
                e,
            )
        })?;
        Ok(result.rows_affected())
    }

    /// Whether `user` has favorited `node_id`.
    pub async fn exists(&self, node_id: NodeId, user: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(1) FROM favorites WHERE nodeid = $1 AND username = $2",
        )
        .bind(node_id)
        .bind(user)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(%node_id, user, error = %e, "Failed to verify favorite record");
            AppError::with_source(ErrorKind::Database, "Failed to verify favorite record", e)
        })?;
        Ok(count > 0)
    }

    /// Raw favorite rows of a user, regardless of current visibility.
    pub async fn find_by_user(&self, user: &str) -> AppResult<Vec<Favorite>> {
        sqlx::query_as::<_, Favorite>(
            "SELECT nodeid, username FROM favorites WHERE username = $1 ORDER BY nodeid ASC",
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list favorites", e))
    }

    /// Favorited nodes reachable in `scope` through a direct share, the
    /// subtree of a shared directory, or ownership.
    pub async fn find_favorited_in_scope(
        &self,
        scope: &VisibilityScope,
        include_deleted: bool,
    ) -> AppResult<Vec<Node>> {
        let target = scope.share_target();
        let nodes = sqlx::query_as::<_, Node>(FAVORITED_IN_SCOPE)
            .bind(target.kind().as_str())
            .bind(target.name())
            .bind(scope.favorites_of())
            .bind(include_deleted)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(scope = ?scope, error = %e, "Failed to load favorited nodes");
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to load favorited nodes for {target}"),
                    e,
                )
            })?;

        debug!(scope = ?scope, count = nodes.len(), "Resolved favorited nodes");
        Ok(nodes)
    }
}
