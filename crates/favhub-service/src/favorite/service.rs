//! Favorite mutation and aggregation service.

use std::collections::HashSet;
use std::sync::Arc;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

use favhub_core::config::FavoritesConfig;
use favhub_core::result::AppResult;
use favhub_core::types::NodeId;
use favhub_entity::favorite::VisibilityScope;
use favhub_entity::node::Node;

use super::merge::FavoriteMerger;
use super::store::FavoriteStore;

/// Marks, unmarks, and lists a user's favorite nodes.
#[derive(Debug, Clone)]
pub struct FavoriteService {
    /// Favorite index and visibility backend.
    store: Arc<dyn FavoriteStore>,
    /// Aggregation settings.
    config: FavoritesConfig,
}

impl FavoriteService {
    /// Creates a new favorite service.
    pub fn new(store: Arc<dyn FavoriteStore>, config: FavoritesConfig) -> Self {
        Self { store, config }
    }

    /// Marks the node at `path` as a favorite of `user`.
    ///
    /// Fails with a persistence error if the path does not resolve, the user
    /// does not exist, or the node is already a favorite of the user.
    pub async fn mark_favorite(&self, path: &str, user: &str) -> AppResult<()> {
        self.store.mark(path, user).await?;
        info!(path, user, "Marked node as favorite");
        Ok(())
    }

    /// Removes the favorite of `user` on the node at `path`.
    ///
    /// After a successful return the pair is absent, whether or not it
    /// existed before.
    pub async fn remove_favorite(&self, path: &str, user: &str) -> AppResult<()> {
        self.store.unmark(path, user).await?;
        info!(path, user, "Removed node from favorites");
        Ok(())
    }

    /// Returns whether `user` has favorited the node `node_id`.
    pub async fn is_favorite(&self, node_id: NodeId, user: &str) -> AppResult<bool> {
        self.store.is_marked(node_id, user).await
    }

    /// Returns every favorite of `user` that is currently reachable through
    /// ownership, a personal share, or a share with one of `groups`.
    ///
    /// The user's own scope comes first, then each group in the given order.
    /// A node reachable through several scopes appears once, at its first
    /// position. The first failing scope aborts the whole call.
    pub async fn get_favorited_nodes(&self, user: &str, groups: &[String]) -> AppResult<Vec<Node>> {
        let include_deleted = self.config.include_deleted;
        let mut merger = FavoriteMerger::new();

        let own = self
            .store
            .favorited_in_scope(&VisibilityScope::user(user), include_deleted)
            .await?;
        merger.extend(own);

        let mut distinct = HashSet::new();
        let scopes: Vec<VisibilityScope> = groups
            .iter()
            .filter(|group| distinct.insert(group.as_str()))
            .map(|group| VisibilityScope::group(user, group.as_str()))
            .collect();

        let store = &self.store;
        let batches: Vec<Vec<Node>> = stream::iter(scopes.iter())
            .map(|scope| store.favorited_in_scope(scope, include_deleted))
            .buffered(self.config.effective_concurrency())
            .try_collect()
            .await?;

        for batch in batches {
            merger.extend(batch);
        }

        debug!(
            user,
            groups = scopes.len(),
            count = merger.len(),
            "Aggregated favorited nodes"
        );
        Ok(merger.into_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use favhub_core::error::{AppError, ErrorKind};
    use favhub_entity::share::Share;

    use crate::favorite::memory::MemoryFavoriteStore;

    fn node(id: i64, owner: &str, path: &str, is_dir: bool) -> Node {
        Node {
            id: NodeId(id),
            owner: owner.to_string(),
            path: path.to_string(),
            is_dir,
            mime_type: if is_dir { "inode/directory" } else { "text/plain" }.to_string(),
            deleted: false,
        }
    }

    /// alice owns /alice/*, bob owns /shared/*, carol owns /team/*.
    async fn seeded() -> MemoryFavoriteStore {
        let store = MemoryFavoriteStore::new();
        for user in ["alice", "bob", "carol"] {
            store.add_user(user).await;
        }
        store.add_node(node(1, "alice", "/alice", true)).await;
        store.add_node(node(2, "alice", "/alice/notes.txt", false)).await;
        store.add_node(node(10, "bob", "/shared", true)).await;
        store.add_node(node(11, "bob", "/shared/sub", true)).await;
        store.add_node(node(12, "bob", "/shared/sub/file", false)).await;
        store.add_node(node(20, "carol", "/team", true)).await;
        store.add_node(node(21, "carol", "/team/plan.md", false)).await;
        store.add_node(node(30, "carol", "/private.txt", false)).await;
        store
    }

    fn service(store: &MemoryFavoriteStore) -> FavoriteService {
        FavoriteService::new(Arc::new(store.clone()), FavoritesConfig::default())
    }

    fn ids(nodes: &[Node]) -> Vec<i64> {
        nodes.iter().map(|n| n.id.get()).collect()
    }

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|g| g.to_string()).collect()
    }

    #[tokio::test]
    async fn test_mark_then_is_favorite() {
        let store = seeded().await;
        let svc = service(&store);
        svc.mark_favorite("/alice/notes.txt", "alice").await.unwrap();
        assert!(svc.is_favorite(NodeId(2), "alice").await.unwrap());
        assert!(!svc.is_favorite(NodeId(2), "bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = seeded().await;
        let svc = service(&store);
        svc.remove_favorite("/alice/notes.txt", "alice").await.unwrap();
        assert!(!svc.is_favorite(NodeId(2), "alice").await.unwrap());

        svc.mark_favorite("/alice/notes.txt", "alice").await.unwrap();
        svc.remove_favorite("/alice/notes.txt", "alice").await.unwrap();
        svc.remove_favorite("/alice/notes.txt", "alice").await.unwrap();
        assert!(!svc.is_favorite(NodeId(2), "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_mark_missing_path_or_duplicate_is_persistence_error() {
        let store = seeded().await;
        let svc = service(&store);
        let err = svc.mark_favorite("/nope", "alice").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);

        svc.mark_favorite("/alice", "alice").await.unwrap();
        let err = svc.mark_favorite("/alice", "alice").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Database);
    }

    #[tokio::test]
    async fn test_no_groups_only_own_visibility() {
        let store = seeded().await;
        store.add_share(Share::with_user(NodeId(21), "alice")).await;
        store.add_share(Share::with_group(NodeId(10), "eng")).await;
        let svc = service(&store);
        for path in ["/alice/notes.txt", "/team/plan.md", "/shared/sub/file", "/private.txt"] {
            svc.mark_favorite(path, "alice").await.unwrap();
        }

        let nodes = svc.get_favorited_nodes("alice", &[]).await.unwrap();
        assert_eq!(ids(&nodes), vec![2, 21]);
    }

    #[tokio::test]
    async fn test_group_share_included_once() {
        let store = seeded().await;
        store.add_share(Share::with_group(NodeId(10), "eng")).await;
        store.add_share(Share::with_group(NodeId(12), "eng")).await;
        let svc = service(&store);
        svc.mark_favorite("/shared/sub/file", "alice").await.unwrap();

        let nodes = svc
            .get_favorited_nodes("alice", &groups(&["eng"]))
            .await
            .unwrap();
        assert_eq!(ids(&nodes), vec![12]);
    }

    #[tokio::test]
    async fn test_dedup_across_user_and_group() {
        let store = seeded().await;
        store.add_share(Share::with_user(NodeId(21), "alice")).await;
        store.add_share(Share::with_group(NodeId(20), "eng")).await;
        let svc = service(&store);
        svc.mark_favorite("/team/plan.md", "alice").await.unwrap();
        svc.mark_favorite("/alice", "alice").await.unwrap();

        let nodes = svc
            .get_favorited_nodes("alice", &groups(&["eng", "eng", "ops"]))
            .await
            .unwrap();
        assert_eq!(ids(&nodes), vec![1, 21]);
    }

    #[tokio::test]
    async fn test_subtree_follows_share_revocation() {
        let store = seeded().await;
        let share = Share::with_user(NodeId(10), "alice");
        store.add_share(share.clone()).await;
        let svc = service(&store);
        svc.mark_favorite("/shared/sub/file", "alice").await.unwrap();

        let nodes = svc.get_favorited_nodes("alice", &[]).await.unwrap();
        assert_eq!(ids(&nodes), vec![12]);

        assert!(store.revoke_share(&share).await);
        let nodes = svc.get_favorited_nodes("alice", &[]).await.unwrap();
        assert!(nodes.is_empty());
        assert!(svc.is_favorite(NodeId(12), "alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_group_named_like_user_ignores_user_shares() {
        let store = seeded().await;
        store.add_share(Share::with_user(NodeId(21), "dave")).await;
        let svc = service(&store);
        svc.mark_favorite("/team/plan.md", "alice").await.unwrap();

        let nodes = svc
            .get_favorited_nodes("alice", &groups(&["dave"]))
            .await
            .unwrap();
        assert!(nodes.is_empty());

        store.add_share(Share::with_group(NodeId(21), "dave")).await;
        let nodes = svc
            .get_favorited_nodes("alice", &groups(&["dave"]))
            .await
            .unwrap();
        assert_eq!(ids(&nodes), vec![21]);
    }

    #[tokio::test]
    async fn test_group_owned_nodes_visible() {
        let store = seeded().await;
        store.add_node(node(40, "eng", "/eng-docs", false)).await;
        let svc = service(&store);
        svc.mark_favorite("/eng-docs", "alice").await.unwrap();

        assert!(svc.get_favorited_nodes("alice", &[]).await.unwrap().is_empty());
        let nodes = svc
            .get_favorited_nodes("alice", &groups(&["eng"]))
            .await
            .unwrap();
        assert_eq!(ids(&nodes), vec![40]);
    }

    #[tokio::test]
    async fn test_concurrent_lookup_matches_sequential() {
        let store = seeded().await;
        store.add_share(Share::with_group(NodeId(10), "eng")).await;
        store.add_share(Share::with_group(NodeId(20), "ops")).await;
        store.add_share(Share::with_group(NodeId(21), "eng")).await;
        let svc = service(&store);
        for path in ["/alice", "/team/plan.md", "/shared/sub", "/shared/sub/file"] {
            svc.mark_favorite(path, "alice").await.unwrap();
        }

        let names = groups(&["ops", "eng"]);
        let sequential = svc.get_favorited_nodes("alice", &names).await.unwrap();
        let parallel = FavoriteService::new(
            Arc::new(store.clone()),
            FavoritesConfig {
                group_lookup_concurrency: 4,
                include_deleted: true,
            },
        )
        .get_favorited_nodes("alice", &names)
        .await
        .unwrap();

        assert_eq!(ids(&sequential), vec![1, 21, 11, 12]);
        assert_eq!(sequential, parallel);
    }

    #[derive(Debug)]
    struct FailingGroupStore {
        inner: MemoryFavoriteStore,
        failing_group: &'static str,
    }

    #[async_trait]
    impl FavoriteStore for FailingGroupStore {
        async fn mark(&self, path: &str, user: &str) -> AppResult<()> {
            self.inner.mark(path, user).await
        }

        async fn unmark(&self, path: &str, user: &str) -> AppResult<()> {
            self.inner.unmark(path, user).await
        }

        async fn is_marked(&self, node_id: NodeId, user: &str) -> AppResult<bool> {
            self.inner.is_marked(node_id, user).await
        }

        async fn favorited_in_scope(
            &self,
            scope: &VisibilityScope,
            include_deleted: bool,
        ) -> AppResult<Vec<Node>> {
            match scope {
                VisibilityScope::Group { group, .. } if group == self.failing_group => {
                    Err(AppError::database("connection reset"))
                }
                _ => self.inner.favorited_in_scope(scope, include_deleted).await,
            }
        }
    }

    #[tokio::test]
    async fn test_group_failure_aborts_aggregation() {
        let inner = seeded().await;
        inner.add_share(Share::with_group(NodeId(20), "eng")).await;
        let svc = FavoriteService::new(
            Arc::new(FailingGroupStore {
                inner: inner.clone(),
                failing_group: "ops",
            }),
            FavoritesConfig::default(),
        );
        svc.mark_favorite("/alice", "alice").await.unwrap();
        svc.mark_favorite("/team", "alice").await.unwrap();

        let result = svc
            .get_favorited_nodes("alice", &groups(&["eng", "ops"]))
            .await;
        let err = result.unwrap_err();
        assert!(err.is_persistence());

        let ok = svc.get_favorited_nodes("alice", &groups(&["eng"])).await.unwrap();
        assert_eq!(ids(&ok), vec![1, 20]);
    }
}
