//! Order-preserving merge of favorite batches.

use std::collections::HashSet;

use favhub_core::types::NodeId;
use favhub_entity::node::Node;

/// Accumulates nodes from successive scopes, keeping the first occurrence
/// of each identity and the order in which identities were first seen.
#[derive(Debug, Default)]
pub struct FavoriteMerger {
    seen: HashSet<NodeId>,
    nodes: Vec<Node>,
}

impl FavoriteMerger {
    /// Create an empty merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `node` unless its identity was already seen. Returns whether
    /// it was appended.
    pub fn push(&mut self, node: Node) -> bool {
        if !self.seen.insert(node.id) {
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Push every node of a batch. Returns how many were appended.
    pub fn extend(&mut self, batch: impl IntoIterator<Item = Node>) -> usize {
        let before = self.nodes.len();
        for node in batch {
            self.push(node);
        }
        self.nodes.len() - before
    }

    /// Number of distinct nodes collected.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Finish merging.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}
