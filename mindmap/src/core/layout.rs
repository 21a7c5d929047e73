//! Layout adapter between the graph and a layered layout engine.
//!
//! Engines compute box-center anchors for every node; the adapter shifts them
//! by half the box size to the top-left positions the renderer draws from.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::{Edge, Node, Orientation, Position, PositionedNode};

/// Box size and separation constants handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpacing {
    pub node_width: f64,
    pub node_height: f64,
    /// Gap between neighbouring boxes within one rank.
    pub node_separation: f64,
    /// Gap between consecutive ranks (tree levels).
    pub rank_separation: f64,
}

impl Default for LayoutSpacing {
    fn default() -> Self {
        Self {
            node_width: 180.0,
            node_height: 50.0,
            node_separation: 30.0,
            rank_separation: 120.0,
        }
    }
}

/// Input handed to a [`LayoutEngine`].
#[derive(Debug, Clone)]
pub struct LayoutRequest<'a> {
    pub node_ids: Vec<&'a str>,
    /// `(source, target)` pairs in edge order.
    pub edges: Vec<(&'a str, &'a str)>,
    pub orientation: Orientation,
    pub spacing: LayoutSpacing,
}

/// Hierarchical graph layout algorithm.
///
/// Returns the box center of each node it could place. Nodes missing from the
/// result are tolerated by the adapter.
pub trait LayoutEngine {
    fn layout(&self, request: &LayoutRequest<'_>) -> HashMap<String, Position>;
}

impl<E: LayoutEngine + ?Sized> LayoutEngine for Box<E> {
    fn layout(&self, request: &LayoutRequest<'_>) -> HashMap<String, Position> {
        (**self).layout(request)
    }
}

pub struct LayoutAdapter<E> {
    engine: E,
    spacing: LayoutSpacing,
}

impl<E: LayoutEngine> LayoutAdapter<E> {
    pub fn new(engine: E, spacing: LayoutSpacing) -> Self {
        Self { engine, spacing }
    }

    pub fn spacing(&self) -> LayoutSpacing {
        self.spacing
    }

    /// Position every node. Output order follows `nodes`.
    pub fn layout(
        &self,
        nodes: &[Node],
        edges: &[Edge],
        orientation: Orientation,
    ) -> Vec<PositionedNode> {
        let request = LayoutRequest {
            node_ids: nodes.iter().map(|node| node.id.as_str()).collect(),
            edges: edges
                .iter()
                .map(|edge| (edge.source.as_str(), edge.target.as_str()))
                .collect(),
            orientation,
            spacing: self.spacing,
        };
        let centers = self.engine.layout(&request);
        debug!(
            nodes = nodes.len(),
            placed = centers.len(),
            orientation = orientation.as_str(),
            "layout computed"
        );

        let half_width = self.spacing.node_width / 2.0;
        let half_height = self.spacing.node_height / 2.0;
        nodes
            .iter()
            .map(|node| {
                let position = match centers.get(&node.id) {
                    Some(center) => Position {
                        x: center.x - half_width,
                        y: center.y - half_height,
                    },
                    None => {
                        warn!(id = %node.id, "layout engine returned no position");
                        Position::default()
                    }
                };
                PositionedNode {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    position,
                }
            })
            .collect()
    }
}

/// Bounding box of a set of positioned boxes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// Deferred request to frame every positioned node in the view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitRequest {
    pub bounds: Bounds,
    pub duration_ms: u64,
}

impl FitRequest {
    /// `None` when there is nothing to frame.
    pub fn covering(
        nodes: &[PositionedNode],
        spacing: &LayoutSpacing,
        duration_ms: u64,
    ) -> Option<Self> {
        let first = nodes.first()?;
        let mut bounds = Bounds {
            min_x: first.position.x,
            min_y: first.position.y,
            max_x: first.position.x + spacing.node_width,
            max_y: first.position.y + spacing.node_height,
        };
        for node in nodes {
            bounds.min_x = bounds.min_x.min(node.position.x);
            bounds.min_y = bounds.min_y.min(node.position.y);
            bounds.max_x = bounds.max_x.max(node.position.x + spacing.node_width);
            bounds.max_y = bounds.max_y.max(node.position.y + spacing.node_height);
        }
        Some(Self {
            bounds,
            duration_ms,
        })
    }
}
