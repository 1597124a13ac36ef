//! Favorite resolution settings.

use serde::{Deserialize, Serialize};

/// Tuning for favorite aggregation across a user's groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesConfig {
    /// How many group scopes may be resolved at once. `1` resolves them
    /// one after another; `0` is treated as `1`.
    #[serde(default = "default_group_lookup_concurrency")]
    pub group_lookup_concurrency: usize,
    /// Whether soft-deleted nodes are returned (with their `deleted` flag set).
    #[serde(default = "default_true")]
    pub include_deleted: bool,
}

impl FavoritesConfig {
    /// Effective concurrency, never below one.
    pub fn effective_concurrency(&self) -> usize {
        self.group_lookup_concurrency.max(1)
    }
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            group_lookup_concurrency: default_group_lookup_concurrency(),
            include_deleted: default_true(),
        }
    }
}

fn default_group_lookup_concurrency() -> usize {
    1
}

fn default_true() -> bool {
    true
}
