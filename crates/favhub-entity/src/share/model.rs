//! Share entity model.
//!
//! A share grants visibility on a node to either a single user or a whole
//! group. The target is stored as two columns (`target_kind`, `target_name`)
//! so that a group and a user with the same name never match each other.

use std::fmt;

use serde::{Deserialize, Serialize};

use favhub_core::types::NodeId;

/// Discriminator stored in `shares.target_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareTargetKind {
    /// Shared with a single user.
    User,
    /// Shared with every member of a group.
    Group,
}

impl ShareTargetKind {
    /// Return the kind as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Group => "group",
        }
    }
}

impl fmt::Display for ShareTargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who a share grants visibility to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ShareTarget {
    /// A single user, by user name.
    User(String),
    /// A group, by group name.
    Group(String),
}

impl ShareTarget {
    /// The discriminator for this target.
    pub fn kind(&self) -> ShareTargetKind {
        match self {
            Self::User(_) => ShareTargetKind::User,
            Self::Group(_) => ShareTargetKind::Group,
        }
    }

    /// The user or group name.
    pub fn name(&self) -> &str {
        match self {
            Self::User(name) | Self::Group(name) => name,
        }
    }
}

impl fmt::Display for ShareTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.name())
    }
}

/// A visibility grant on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    /// The shared node.
    pub node_id: NodeId,
    /// Who the node is shared with.
    pub target: ShareTarget,
}

impl Share {
    /// Share a node with a single user.
    pub fn with_user(node_id: NodeId, user: impl Into<String>) -> Self {
        Self {
            node_id,
            target: ShareTarget::User(user.into()),
        }
    }

    /// Share a node with a group.
    pub fn with_group(node_id: NodeId, group: impl Into<String>) -> Self {
        Self {
            node_id,
            target: ShareTarget::Group(group.into()),
        }
    }
}
