//! In-memory favorite store.
//!
//! Holds its own copy of the node store, user list, and share registry so
//! that favorite semantics can be exercised without PostgreSQL. Constraint
//! violations are reported exactly as the database-backed store reports
//! them: as `ErrorKind::Database`.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use favhub_core::error::AppError;
use favhub_core::result::AppResult;
use favhub_core::types::NodeId;
use favhub_entity::favorite::VisibilityScope;
use favhub_entity::node::Node;
use favhub_entity::share::Share;

use super::store::FavoriteStore;

#[derive(Debug, Default)]
struct Tables {
    nodes: BTreeMap<NodeId, Node>,
    users: HashSet<String>,
    shares: Vec<Share>,
    favorites: BTreeSet<(NodeId, String)>,
}

impl Tables {
    fn live_node_at(&self, path: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.path == path && !n.deleted)
    }
}

/// Favorite store backed by process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoriteStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryFavoriteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user account.
    pub async fn add_user(&self, user: impl Into<String>) {
        self.tables.write().await.users.insert(user.into());
    }

    /// Insert or replace a node.
    pub async fn add_node(&self, node: Node) {
        self.tables.write().await.nodes.insert(node.id, node);
    }

    /// Remove a node, dropping its shares and favorites with it.
    pub async fn remove_node(&self, id: NodeId) -> bool {
        let mut tables = self.tables.write().await;
        let removed = tables.nodes.remove(&id).is_some();
        tables.shares.retain(|s| s.node_id != id);
        tables.favorites.retain(|(node_id, _)| *node_id != id);
        removed
    }

    /// Record a share.
    pub async fn add_share(&self, share: Share) {
        let mut tables = self.tables.write().await;
        if !tables.shares.contains(&share) {
            tables.shares.push(share);
        }
    }

    /// Revoke a share. Returns whether it existed.
    pub async fn revoke_share(&self, share: &Share) -> bool {
        let mut tables = self.tables.write().await;
        let before = tables.shares.len();
        tables.shares.retain(|s| s != share);
        tables.shares.len() != before
    }

    /// Number of favorite rows held for `user`, visible or not.
    pub async fn favorite_count(&self, user: &str) -> usize {
        self.tables
            .read()
            .await
            .favorites
            .iter()
            .filter(|(_, u)| u == user)
            .count()
    }
}

#[async_trait]
impl FavoriteStore for MemoryFavoriteStore {
    async fn mark(&self, path: &str, user: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let node_id = tables
            .live_node_at(path)
            .map(|n| n.id)
            .ok_or_else(|| AppError::database(format!("No node at '{path}'")))?;
        if !tables.users.contains(user) {
            return Err(AppError::database(format!("Unknown user '{user}'")));
        }
        if !tables.favorites.insert((node_id, user.to_string())) {
            return Err(AppError::database(format!(
                "Node at '{path}' is already a favorite of '{user}'"
            )));
        }
        Ok(())
    }

    async fn unmark(&self, path: &str, user: &str) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        let ids: HashSet<NodeId> = tables
            .nodes
            .values()
            .filter(|n| n.path == path)
            .map(|n| n.id)
            .collect();
        tables
            .favorites
            .retain(|(node_id, u)| u != user || !ids.contains(node_id));
        Ok(())
    }

    async fn is_marked(&self, node_id: NodeId, user: &str) -> AppResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.favorites.contains(&(node_id, user.to_string())))
    }

    async fn favorited_in_scope(
        &self,
        scope: &VisibilityScope,
        include_deleted: bool,
    ) -> AppResult<Vec<Node>> {
        let tables = self.tables.read().await;
        let target = scope.share_target();

        let mut visible: HashSet<NodeId> = HashSet::new();
        for share in tables.shares.iter().filter(|s| s.target == target) {
            visible.insert(share.node_id);
            if let Some(shared) = tables.nodes.get(&share.node_id) {
                visible.extend(
                    tables
                        .nodes
                        .values()
                        .filter(|n| shared.contains(n))
                        .map(|n| n.id),
                );
            }
        }
        visible.extend(
            tables
                .nodes
                .values()
                .filter(|n| n.owner == scope.principal())
                .map(|n| n.id),
        );

        let user = scope.favorites_of();
        let mut nodes: Vec<Node> = tables
            .nodes
            .values()
            .filter(|n| visible.contains(&n.id))
            .filter(|n| tables.favorites.contains(&(n.id, user.to_string())))
            .filter(|n| include_deleted || !n.deleted)
            .cloned()
            .collect();
        nodes.sort_by(|a, b| a.path.cmp(&b.path).then(a.id.cmp(&b.id)));

        debug!(scope = ?scope, count = nodes.len(), "Resolved favorited nodes in memory");
        Ok(nodes)
    }
}
