use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::instrument;

/// Label of the member at the root of every network.
pub const ROOT_LABEL: &str = "self";

/// Data payload for network nodes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NodeData {
    /// `self` for the root, `G{generation}-{position}` otherwise
    pub label: String,
    /// 0 for the root, 1.. for downline generations
    pub generation: usize,
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Directed parent → child edge, by label.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

/// Node in the arena-based network.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

/// Rooted downline tree.
///
/// Uses a generational arena for node storage; a label index gives O(1)
/// lookups by `G{g}-{j}` label. Insertion order is kept so that listing
/// nodes yields generation order, positions ascending.
#[derive(Debug, Default)]
pub struct Network {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    order: Vec<Index>,
    by_label: HashMap<String, Index>,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let label = data.label.clone();
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        self.order.push(node_idx);
        self.by_label.insert(label, node_idx);
        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn find(&self, label: &str) -> Option<&TreeNode> {
        self.by_label.get(label).and_then(|&idx| self.arena.get(idx))
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of downline nodes (everything but the root).
    pub fn affiliate_count(&self) -> usize {
        self.order.len().saturating_sub(usize::from(self.root.is_some()))
    }

    /// Nodes in generation order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> + '_ {
        self.order
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .map(|node| &node.data)
    }

    /// Edges in the order their child nodes were inserted.
    pub fn edges(&self) -> Vec<Edge> {
        self.order
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .filter_map(|node| {
                let parent = self.arena.get(node.parent?)?;
                Some(Edge {
                    parent: parent.data.label.clone(),
                    child: node.data.label.clone(),
                })
            })
            .collect()
    }

    pub fn parent_of(&self, label: &str) -> Option<&str> {
        let node = self.find(label)?;
        let parent = self.arena.get(node.parent?)?;
        Some(parent.data.label.as_str())
    }

    pub fn children_of(&self, label: &str) -> Vec<&str> {
        self.find(label)
            .map(|node| {
                node.children
                    .iter()
                    .filter_map(|&idx| self.arena.get(idx))
                    .map(|child| child.data.label.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels, the root counting as one.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.nodes()
            .map(|data| data.generation + 1)
            .max()
            .unwrap_or(0)
    }

    /// Labels of all nodes without children, in generation order.
    pub fn leaf_labels(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|&idx| self.arena.get(idx))
            .filter(|node| node.children.is_empty())
            .map(|node| node.data.label.as_str())
            .collect()
    }
}

impl Serialize for Network {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nodes: Vec<&NodeData> = self.nodes().collect();
        let mut state = serializer.serialize_struct("Network", 2)?;
        state.serialize_field("nodes", &nodes)?;
        state.serialize_field("edges", &self.edges())?;
        state.end()
    }
}

/// Preorder traversal, children left to right.
pub struct TreeIterator<'a> {
    network: &'a Network,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(network: &'a Network) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = network.root() {
            stack.push(root);
        }
        Self { network, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.network.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        for &child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some((current_idx, node))
    }
}
