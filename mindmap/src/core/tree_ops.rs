//! Structural edits on the mindmap graph.
//!
//! Each operation reads the current store and returns a [`TreeEdit`] holding the
//! complete replacement node/edge sets. Nothing here touches layout or
//! rendering; the session applies the edit with [`GraphStore::replace`] and
//! recomputes positions afterwards.

use std::collections::{HashSet, VecDeque};

use crate::error::MindmapError;
use crate::graph::{Edge, GraphStore, Node, ROOT_ID, child_edges};

/// Replacement graph produced by a structural edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEdit {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Node that should become the selection, if the edit moves it.
    pub select: Option<String>,
    /// Node created by the edit, if any.
    pub created: Option<String>,
    /// Node ids removed by the edit, in traversal order.
    pub removed: Vec<String>,
}

impl TreeEdit {
    fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self {
            nodes,
            edges,
            select: None,
            created: None,
            removed: Vec::new(),
        }
    }
}

/// Add a new child under the selected node.
pub fn insert_child(
    store: &GraphStore,
    selected: Option<&str>,
    new_id: String,
    label: &str,
) -> Result<TreeEdit, MindmapError> {
    let parent = selected.ok_or(MindmapError::NoSelection)?;
    if !store.contains(parent) {
        return Err(MindmapError::UnknownNode(parent.to_string()));
    }
    Ok(append_under(store, parent, new_id, label))
}

/// Add a new node next to the selected node, under the selection's parent.
pub fn insert_sibling(
    store: &GraphStore,
    selected: Option<&str>,
    new_id: String,
    label: &str,
) -> Result<TreeEdit, MindmapError> {
    let selected = selected.ok_or(MindmapError::NoSelection)?;
    if !store.contains(selected) {
        return Err(MindmapError::UnknownNode(selected.to_string()));
    }
    let parent = store
        .parent_of(selected)
        .ok_or(MindmapError::RootHasNoSibling)?
        .to_string();
    Ok(append_under(store, &parent, new_id, label))
}

fn append_under(store: &GraphStore, parent: &str, new_id: String, label: &str) -> TreeEdit {
    let mut nodes = store.nodes().to_vec();
    let mut edges = store.edges().to_vec();
    edges.push(Edge::new(parent, &new_id));
    nodes.push(Node::new(new_id.clone(), label));
    TreeEdit {
        created: Some(new_id),
        ..TreeEdit::from_parts(nodes, edges)
    }
}

/// Remove `node_id` and all of its descendants, plus every edge touching them.
///
/// The parent of the removed subtree becomes the new selection.
pub fn delete_subtree(store: &GraphStore, node_id: &str) -> Result<TreeEdit, MindmapError> {
    if node_id == ROOT_ID {
        return Err(MindmapError::RootUndeletable);
    }
    if !store.contains(node_id) {
        return Err(MindmapError::UnknownNode(node_id.to_string()));
    }

    let parent = store.parent_of(node_id).map(str::to_string);
    let removed = subtree_ids(store.edges(), node_id);
    let doomed: HashSet<&str> = removed.iter().map(String::as_str).collect();

    let nodes = store
        .nodes()
        .iter()
        .filter(|node| !doomed.contains(node.id.as_str()))
        .cloned()
        .collect();
    let edges = store
        .edges()
        .iter()
        .filter(|edge| {
            !doomed.contains(edge.source.as_str()) && !doomed.contains(edge.target.as_str())
        })
        .cloned()
        .collect();

    Ok(TreeEdit {
        select: parent,
        removed,
        ..TreeEdit::from_parts(nodes, edges)
    })
}

/// Breadth-first closure of `node_id` over outgoing edges, `node_id` first.
///
/// Ids already visited are skipped, so a malformed cyclic edge set still
/// terminates.
pub fn subtree_ids(edges: &[Edge], node_id: &str) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut order = Vec::new();
    let mut queue = VecDeque::from([node_id]);
    while let Some(current) = queue.pop_front() {
        if !visited.insert(current) {
            continue;
        }
        order.push(current.to_string());
        queue.extend(child_edges(edges, current).map(|edge| edge.target.as_str()));
    }
    order
}

/// A graph holding only a fresh root.
pub fn reset(root_label: &str) -> TreeEdit {
    let store = GraphStore::with_root(root_label);
    TreeEdit::from_parts(store.nodes().to_vec(), store.edges().to_vec())
}
