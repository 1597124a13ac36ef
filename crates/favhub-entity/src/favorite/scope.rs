//! Visibility scopes for favorite resolution.

use serde::{Deserialize, Serialize};

use crate::share::ShareTarget;

/// The subject of one visibility resolution pass.
///
/// A user scope sees what the user owns or has been shared. A group scope
/// sees, on behalf of `user`, what the group owns or has been shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum VisibilityScope {
    /// Direct visibility of a single user.
    User {
        /// The user name.
        user: String,
    },
    /// Visibility mediated by one of the user's groups.
    Group {
        /// The user whose favorites are resolved.
        user: String,
        /// The group granting visibility.
        group: String,
    },
}

impl VisibilityScope {
    /// Scope for a user's own visibility.
    pub fn user(user: impl Into<String>) -> Self {
        Self::User { user: user.into() }
    }

    /// Scope for a user's visibility through `group`.
    pub fn group(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self::Group {
            user: user.into(),
            group: group.into(),
        }
    }

    /// The user whose favorite index filters the result.
    pub fn favorites_of(&self) -> &str {
        match self {
            Self::User { user } | Self::Group { user, .. } => user,
        }
    }

    /// The principal that owns or receives shares in this scope.
    pub fn principal(&self) -> &str {
        match self {
            Self::User { user } => user,
            Self::Group { group, .. } => group,
        }
    }

    /// The share target that grants visibility in this scope.
    pub fn share_target(&self) -> ShareTarget {
        match self {
            Self::User { user } => ShareTarget::User(user.clone()),
            Self::Group { group, .. } => ShareTarget::Group(group.clone()),
        }
    }
}
