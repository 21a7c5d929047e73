//! Node/edge data model for the mindmap tree.
//!
//! The graph is stored as flat node and edge lists. Edges encode a strict tree
//! rooted at [`ROOT_ID`]; sibling order is the order edges appear in the edge
//! list (insertion order), there is no separate rank field.

use serde::{Deserialize, Serialize};

/// Id of the distinguished root node. Matches documents written by earlier
/// releases, which always used `"1"`.
pub const ROOT_ID: &str = "1";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    /// Build the edge `source -> target` with its derived id `e{source}-{target}`.
    pub fn new(source: &str, target: &str) -> Self {
        Self {
            id: edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
        }
    }
}

pub fn edge_id(source: &str, target: &str) -> String {
    format!("e{}-{}", source, target)
}

/// Layout flow direction. Also decides which arrow keys walk the hierarchy.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Root on the left, children flow to the right.
    #[default]
    Horizontal,
    /// Root on top, children flow downwards.
    Vertical,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node with its derived top-left screen position. Never authoritative:
/// regenerated from the store after every structural or orientation change.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PositionedNode {
    pub id: String,
    pub label: String,
    pub position: Position,
}

/// Single source of truth for the current nodes and edges.
///
/// The store does not validate: callers keep the tree invariants, see
/// [`crate::core::invariants::validate_graph`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    /// A store holding only the root node.
    pub fn with_root(label: &str) -> Self {
        Self {
            nodes: vec![Node::new(ROOT_ID, label)],
            edges: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Atomically swap in a new node and edge set.
    pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        parent_edge(&self.edges, id).map(|edge| edge.source.as_str())
    }

    /// True while the graph is still the untouched default: the root alone,
    /// carrying the default label.
    pub fn is_pristine(&self, default_label: &str) -> bool {
        self.nodes.len() <= 1
            && self
                .nodes
                .first()
                .is_none_or(|node| node.label == default_label)
    }
}

/// The edge whose target is `id`, if any.
pub fn parent_edge<'a>(edges: &'a [Edge], id: &str) -> Option<&'a Edge> {
    edges.iter().find(|edge| edge.target == id)
}

/// Outgoing edges of `id`, in edge order.
pub fn child_edges<'a>(edges: &'a [Edge], id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
    edges.iter().filter(move |edge| edge.source == id)
}
