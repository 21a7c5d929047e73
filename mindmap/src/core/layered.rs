//! Built-in layered layout for trees.
//!
//! Ranks follow tree depth. Leaves are packed along the cross axis in
//! depth-first order and every parent is centered over its first and last
//! child, which gives the familiar tidy mindmap shape for both orientations.

use std::collections::{HashMap, HashSet};

use crate::core::layout::{LayoutEngine, LayoutRequest, LayoutSpacing};
use crate::graph::{Orientation, Position};

#[derive(Debug, Default, Clone, Copy)]
pub struct LayeredTreeEngine;

impl LayoutEngine for LayeredTreeEngine {
    fn layout(&self, request: &LayoutRequest<'_>) -> HashMap<String, Position> {
        let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut has_parent = HashSet::new();
        for (source, target) in &request.edges {
            children.entry(*source).or_default().push(*target);
            has_parent.insert(*target);
        }

        let axes = Axes::new(request.orientation, &request.spacing);
        let mut placer = Placer {
            children: &children,
            axes: &axes,
            visited: HashSet::new(),
            cursor: 0.0,
            placed: HashMap::new(),
        };
        // Anything without a parent starts its own tree; a well-formed graph
        // only has the root here.
        for &id in &request.node_ids {
            if !has_parent.contains(id) {
                placer.place(id);
            }
        }

        placer
            .placed
            .into_iter()
            .map(|(id, (depth, cross))| (id.to_string(), axes.to_position(depth, cross)))
            .collect()
    }
}

/// Maps rank/cross coordinates onto screen axes for an orientation.
struct Axes {
    orientation: Orientation,
    rank_size: f64,
    rank_step: f64,
    cross_size: f64,
    cross_step: f64,
}

impl Axes {
    fn new(orientation: Orientation, spacing: &LayoutSpacing) -> Self {
        let (rank_size, cross_size) = match orientation {
            Orientation::Horizontal => (spacing.node_width, spacing.node_height),
            Orientation::Vertical => (spacing.node_height, spacing.node_width),
        };
        Self {
            orientation,
            rank_size,
            rank_step: rank_size + spacing.rank_separation,
            cross_size,
            cross_step: cross_size + spacing.node_separation,
        }
    }

    fn to_position(&self, depth: usize, cross: f64) -> Position {
        let rank = depth as f64 * self.rank_step + self.rank_size / 2.0;
        match self.orientation {
            Orientation::Horizontal => Position { x: rank, y: cross },
            Orientation::Vertical => Position { x: cross, y: rank },
        }
    }
}

struct Placer<'a> {
    children: &'a HashMap<&'a str, Vec<&'a str>>,
    axes: &'a Axes,
    visited: HashSet<&'a str>,
    cursor: f64,
    placed: HashMap<&'a str, (usize, f64)>,
}

/// A node whose children are still being placed.
struct Frame<'a> {
    id: &'a str,
    depth: usize,
    next_child: usize,
    centers: Vec<f64>,
}

impl<'a> Frame<'a> {
    fn new(id: &'a str, depth: usize) -> Self {
        Self {
            id,
            depth,
            next_child: 0,
            centers: Vec::new(),
        }
    }
}

impl<'a> Placer<'a> {
    /// Place `root` and its subtree in post-order. Uses an explicit stack so
    /// arbitrarily deep trees are fine.
    fn place(&mut self, root: &'a str) {
        if !self.visited.insert(root) {
            return;
        }
        let children = self.children;
        let mut stack = vec![Frame::new(root, 0)];
        while let Some(frame) = stack.last_mut() {
            let kids = children.get(frame.id).map(Vec::as_slice).unwrap_or_default();
            if let Some(&child) = kids.get(frame.next_child) {
                frame.next_child += 1;
                let depth = frame.depth + 1;
                if self.visited.insert(child) {
                    stack.push(Frame::new(child, depth));
                }
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            let cross = self.finish(&done);
            if let Some(parent) = stack.last_mut() {
                parent.centers.push(cross);
            }
        }
    }

    /// Cross-axis center of a node whose children are all placed: centered over
    /// its first and last child, or the next free slot for a leaf.
    fn finish(&mut self, frame: &Frame<'a>) -> f64 {
        let cross = match (frame.centers.first(), frame.centers.last()) {
            (Some(first), Some(last)) => (first + last) / 2.0,
            _ => {
                let center = self.cursor + self.axes.cross_size / 2.0;
                self.cursor += self.axes.cross_step;
                center
            }
        };
        self.placed.insert(frame.id, (frame.depth, cross));
        cross
    }
}
