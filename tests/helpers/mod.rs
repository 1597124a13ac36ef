//! Shared helpers for database-backed integration tests.
//!
//! Database tests are `#[ignore]`d by default; run them with
//! `cargo test -- --ignored` and `FAVHUB_TEST_DATABASE_URL` pointing at a
//! PostgreSQL instance. Each [`TestDb`] lives in its own freshly created
//! schema so tests can run concurrently against the same database.

use std::sync::Arc;

use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Executor, Row};

use favhub_core::config::FavoritesConfig;
use favhub_core::types::NodeId;
use favhub_database::DatabasePool;
use favhub_database::repositories::FavoriteRepository;
use favhub_entity::share::ShareTarget;
use favhub_service::FavoriteService;

/// Environment variable holding the test database URL.
pub const DATABASE_URL_VAR: &str = "FAVHUB_TEST_DATABASE_URL";

/// Column types used for `nodes.nodeid` and the columns referencing it.
#[derive(Debug, Clone, Copy)]
pub enum NodeKey {
    /// `BIGSERIAL` / `BIGINT`
    Big,
    /// `SERIAL` / `INTEGER`
    Int,
}

impl NodeKey {
    fn serial(self) -> &'static str {
        match self {
            Self::Big => "BIGSERIAL",
            Self::Int => "SERIAL",
        }
    }

    fn reference(self) -> &'static str {
        match self {
            Self::Big => "BIGINT",
            Self::Int => "INTEGER",
        }
    }
}

fn collaborator_tables(key: NodeKey) -> [String; 4] {
    [
        "CREATE TABLE users (username TEXT PRIMARY KEY)".to_string(),
        format!(
            "CREATE TABLE nodes ( \
                nodeid {} PRIMARY KEY, \
                owner TEXT NOT NULL, \
                path TEXT NOT NULL, \
                isdir BOOLEAN NOT NULL DEFAULT FALSE, \
                mimetype TEXT NOT NULL DEFAULT '', \
                deleted BOOLEAN NOT NULL DEFAULT FALSE)",
            key.serial()
        ),
        "CREATE UNIQUE INDEX nodes_live_path_key ON nodes (path) WHERE NOT deleted".to_string(),
        format!(
            "CREATE TABLE shares ( \
                nodeid {} NOT NULL REFERENCES nodes (nodeid) ON DELETE CASCADE, \
                target_kind TEXT NOT NULL CHECK (target_kind IN ('user', 'group')), \
                target_name TEXT NOT NULL, \
                UNIQUE (nodeid, target_kind, target_name))",
            key.reference()
        ),
    ]
}

/// An isolated schema with the node store, users, and share registry.
pub struct TestDb {
    /// Pool whose connections all use the test schema.
    pub pool: PgPool,
    handle: DatabasePool,
    admin: PgPool,
    schema: String,
}

impl TestDb {
    /// Create a fresh schema whose node store uses `BIGINT` handles.
    pub async fn new() -> Self {
        Self::with_node_key(NodeKey::Big).await
    }

    /// Create a fresh schema whose node handles use the given column type.
    pub async fn with_node_key(key: NodeKey) -> Self {
        let url = std::env::var(DATABASE_URL_VAR)
            .unwrap_or_else(|_| panic!("{DATABASE_URL_VAR} must be set for database tests"));

        let schema = format!("favhub_test_{}", uuid::Uuid::new_v4().simple());
        let admin = PgPool::connect(&url)
            .await
            .expect("Failed to connect to test database");
        admin
            .execute(format!("CREATE SCHEMA {schema}").as_str())
            .await
            .expect("Failed to create test schema");

        let search_path = format!("SET search_path TO {schema}");
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .after_connect(move |conn, _meta| {
                let search_path = search_path.clone();
                Box::pin(async move {
                    conn.execute(search_path.as_str()).await?;
                    Ok(())
                })
            })
            .connect(&url)
            .await
            .expect("Failed to connect test pool");

        let handle = DatabasePool::from_pool(pool.clone());
        assert!(handle.health_check().await.expect("Health check failed"));

        for statement in collaborator_tables(key) {
            pool.execute(statement.as_str())
                .await
                .expect("Failed to create collaborator table");
        }
        favhub_database::schema::init_favorites(handle.pool())
            .await
            .expect("Failed to init favorites");

        Self {
            pool,
            handle,
            admin,
            schema,
        }
    }

    /// Favorite service wired onto this schema.
    pub fn service(&self) -> FavoriteService {
        FavoriteService::new(
            Arc::new(FavoriteRepository::new(self.pool.clone())),
            FavoritesConfig::default(),
        )
    }

    /// Register a user account.
    pub async fn add_user(&self, name: &str) {
        sqlx::query("INSERT INTO users (username) VALUES ($1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .expect("insert user");
    }

    /// Insert a node and return its handle.
    pub async fn add_node(&self, owner: &str, path: &str, is_dir: bool) -> NodeId {
        let mime = if is_dir { "inode/directory" } else { "text/plain" };
        let row = sqlx::query(
            "INSERT INTO nodes (owner, path, isdir, mimetype) VALUES ($1, $2, $3, $4) \
             RETURNING nodeid::BIGINT AS nodeid",
        )
        .bind(owner)
        .bind(path)
        .bind(is_dir)
        .bind(mime)
        .fetch_one(&self.pool)
        .await
        .expect("insert node");
        NodeId::new(row.get::<i64, _>("nodeid"))
    }

    /// Flag a node as soft-deleted.
    pub async fn soft_delete(&self, id: NodeId) {
        sqlx::query("UPDATE nodes SET deleted = TRUE WHERE nodeid = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .expect("soft delete node");
    }

    /// Remove a node row entirely.
    pub async fn delete_node(&self, id: NodeId) {
        sqlx::query("DELETE FROM nodes WHERE nodeid = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .expect("delete node");
    }

    /// Grant a share.
    pub async fn share(&self, id: NodeId, target: &ShareTarget) {
        sqlx::query("INSERT INTO shares (nodeid, target_kind, target_name) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(target.kind().as_str())
            .bind(target.name())
            .execute(&self.pool)
            .await
            .expect("insert share");
    }

    /// Revoke a share.
    pub async fn revoke(&self, id: NodeId, target: &ShareTarget) {
        sqlx::query(
            "DELETE FROM shares WHERE nodeid = $1 AND target_kind = $2 AND target_name = $3",
        )
        .bind(id)
        .bind(target.kind().as_str())
        .bind(target.name())
        .execute(&self.pool)
        .await
        .expect("delete share");
    }

    /// Drop the schema and close both pools.
    pub async fn teardown(self) {
        self.handle.close().await;
        let _ = self
            .admin
            .execute(format!("DROP SCHEMA {} CASCADE", self.schema).as_str())
            .await;
        self.admin.close().await;
    }
}

/// Build a user target.
pub fn user(name: &str) -> ShareTarget {
    ShareTarget::User(name.to_string())
}

/// Build a group target.
pub fn group(name: &str) -> ShareTarget {
    ShareTarget::Group(name.to_string())
}
