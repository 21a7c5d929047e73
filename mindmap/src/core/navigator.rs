//! Arrow-key navigation over the tree.
//!
//! The orientation decides which arrow pair walks the hierarchy (towards the
//! parent or the first child); the orthogonal pair always steps between
//! siblings.

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, Node, Orientation, child_edges, parent_edge};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Tree relation an arrow key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Parent,
    FirstChild,
    PreviousSibling,
    NextSibling,
}

pub fn relation_for(direction: Direction, orientation: Orientation) -> Relation {
    match (orientation, direction) {
        (Orientation::Vertical, Direction::Up) | (Orientation::Horizontal, Direction::Left) => {
            Relation::Parent
        }
        (Orientation::Vertical, Direction::Down) | (Orientation::Horizontal, Direction::Right) => {
            Relation::FirstChild
        }
        (Orientation::Vertical, Direction::Left) | (Orientation::Horizontal, Direction::Up) => {
            Relation::PreviousSibling
        }
        (Orientation::Vertical, Direction::Right) | (Orientation::Horizontal, Direction::Down) => {
            Relation::NextSibling
        }
    }
}

/// Node id the selection should move to, or `None` when nothing is selected
/// or the implied node does not exist (parent of root, child of a leaf, past
/// the last sibling).
pub fn next_selection(
    nodes: &[Node],
    edges: &[Edge],
    selected: Option<&str>,
    direction: Direction,
    orientation: Orientation,
) -> Option<String> {
    let selected = selected?;
    if !nodes.iter().any(|node| node.id == selected) {
        return None;
    }

    let parent = parent_edge(edges, selected);
    let relation = relation_for(direction, orientation);
    let target = match relation {
        Relation::Parent => parent.map(|edge| edge.source.as_str()),
        Relation::FirstChild => child_edges(edges, selected)
            .next()
            .map(|edge| edge.target.as_str()),
        Relation::PreviousSibling | Relation::NextSibling => {
            let parent = parent?;
            let siblings: Vec<&Edge> = child_edges(edges, &parent.source).collect();
            let index = siblings.iter().position(|edge| edge.target == selected)?;
            let step = if relation == Relation::PreviousSibling {
                index.checked_sub(1)
            } else {
                Some(index + 1)
            };
            step.and_then(|i| siblings.get(i).copied())
                .map(|edge| edge.target.as_str())
        }
    };
    target.map(str::to_string)
}
