//! Favorite commands.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use favhub_core::error::AppError;
use favhub_core::types::NodeId;
use favhub_database::DatabasePool;
use favhub_database::repositories::NodeRepository;
use favhub_entity::node::Node;
use favhub_service::FavoriteService;

use crate::output::{self, OutputFormat};

/// Arguments naming a node by path on behalf of a user
#[derive(Debug, Args)]
pub struct PathUserArgs {
    /// Node path
    #[arg(short, long)]
    pub path: String,
    /// User name
    #[arg(short, long)]
    pub user: String,
}

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// User name
    #[arg(short, long)]
    pub user: String,
    /// Numeric node handle
    #[arg(short, long, conflicts_with = "path", required_unless_present = "path")]
    pub node_id: Option<i64>,
    /// Node path, resolved to its handle first
    #[arg(short, long)]
    pub path: Option<String>,
}

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// User name
    #[arg(short, long)]
    pub user: String,
    /// Group the user belongs to (repeatable)
    #[arg(short, long = "group")]
    pub groups: Vec<String>,
}

/// Favorite display row
#[derive(Debug, Serialize, Tabled)]
struct NodeRow {
    /// Node handle
    id: i64,
    /// Name
    name: String,
    /// Path
    path: String,
    /// Owner
    owner: String,
    /// Directory flag
    dir: bool,
    /// MIME type
    mime_type: String,
    /// Soft-delete flag
    deleted: bool,
}

impl From<&Node> for NodeRow {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.get(),
            name: node.name().to_string(),
            path: node.path.clone(),
            owner: node.owner.clone(),
            dir: node.is_dir,
            mime_type: node.mime_type.clone(),
            deleted: node.deleted,
        }
    }
}

/// Mark a node as favorite
pub async fn mark(args: &PathUserArgs, service: &FavoriteService) -> Result<(), AppError> {
    service.mark_favorite(&args.path, &args.user).await?;
    output::print_success(&format!(
        "Marked '{}' as a favorite of '{}'",
        args.path, args.user
    ));
    Ok(())
}

/// Remove a node from favorites
pub async fn unmark(args: &PathUserArgs, service: &FavoriteService) -> Result<(), AppError> {
    service.remove_favorite(&args.path, &args.user).await?;
    output::print_success(&format!(
        "'{}' is not a favorite of '{}'",
        args.path, args.user
    ));
    Ok(())
}

/// Check favorite state
pub async fn check(
    args: &CheckArgs,
    service: &FavoriteService,
    pool: &DatabasePool,
    format: OutputFormat,
) -> Result<(), AppError> {
    let node_id = match (args.node_id, &args.path) {
        (Some(raw), _) => NodeId::new(raw),
        (None, Some(path)) => NodeRepository::new(pool.pool().clone())
            .find_by_path(path)
            .await?
            .map(|node| node.id)
            .ok_or_else(|| AppError::not_found(format!("No node at '{path}'")))?,
        (None, None) => return Err(AppError::validation("Either --node-id or --path is required")),
    };

    let favorite = service.is_favorite(node_id, &args.user).await?;
    output::print_value(&favorite, format);
    Ok(())
}

/// List visible favorites
pub async fn list(
    args: &ListArgs,
    service: &FavoriteService,
    format: OutputFormat,
) -> Result<(), AppError> {
    let nodes = service.get_favorited_nodes(&args.user, &args.groups).await?;
    let rows: Vec<NodeRow> = nodes.iter().map(NodeRow::from).collect();
    output::print_list(&rows, format);
    Ok(())
}
