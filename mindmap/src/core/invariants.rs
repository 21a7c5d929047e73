//! Tree invariants for a node/edge graph.

use crate::graph::{Edge, Node};
use std::collections::{HashMap, HashSet, VecDeque};

/// Check the tree invariants of a graph rooted at `root_id`:
/// - No duplicate node ids or edge ids
/// - Root present and without a parent
/// - Every edge endpoint names an existing node
/// - No node has more than one parent
/// - Every node is reachable from the root
///
/// Returns stable error messages in the order above; empty means valid.
pub fn validate_graph(nodes: &[Node], edges: &[Edge], root_id: &str) -> Vec<String> {
    let mut errors = Vec::new();

    let mut node_ids = HashSet::new();
    for node in nodes {
        if !node_ids.insert(node.id.as_str()) {
            errors.push(format!("duplicate node id '{}'", node.id));
        }
    }

    let mut edge_ids = HashSet::new();
    for edge in edges {
        if !edge_ids.insert(edge.id.as_str()) {
            errors.push(format!("duplicate edge id '{}'", edge.id));
        }
    }

    if !node_ids.contains(root_id) {
        errors.push(format!("root node '{}' is missing", root_id));
    }

    let mut parents: HashMap<&str, usize> = HashMap::new();
    for edge in edges {
        for endpoint in [&edge.source, &edge.target] {
            if !node_ids.contains(endpoint.as_str()) {
                errors.push(format!(
                    "edge '{}' references unknown node '{}'",
                    edge.id, endpoint
                ));
            }
        }
        *parents.entry(edge.target.as_str()).or_default() += 1;
    }

    if parents.contains_key(root_id) {
        errors.push(format!("root node '{}' has a parent", root_id));
    }

    let mut multi_parent: Vec<&str> = parents
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| *id)
        .collect();
    multi_parent.sort_unstable();
    for id in multi_parent {
        errors.push(format!("node '{}' has more than one parent", id));
    }

    let reachable = reachable_from(edges, root_id);
    for node in nodes {
        if node_ids.contains(root_id) && !reachable.contains(node.id.as_str()) {
            errors.push(format!("node '{}' is not reachable from root", node.id));
        }
    }

    errors
}

fn reachable_from<'a>(edges: &'a [Edge], root_id: &'a str) -> HashSet<&'a str> {
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        children
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }

    let mut seen = HashSet::new();
    let mut queue = VecDeque::from([root_id]);
    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        if let Some(kids) = children.get(current) {
            queue.extend(kids.iter().copied());
        }
    }
    seen
}
