//! Test-only helpers: graph builders and scripted collaborators.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::core::ids::SequentialIds;
use crate::core::layout::{FitRequest, LayoutEngine, LayoutRequest};
use crate::graph::{Edge, GraphStore, Node, Position, ROOT_ID};
use crate::io::ad::{AdQueue, AdSlotRequest};
use crate::io::config::MindmapConfig;
use crate::io::host::{ArtifactSink, Confirm, Viewport};
use crate::session::Session;

/// Store with the given `(source, target)` edges; every node is labeled with
/// its own id.
pub fn store_from_edges(edges: &[(&str, &str)]) -> GraphStore {
    let mut nodes = vec![Node::new(ROOT_ID, ROOT_ID)];
    for (_, target) in edges {
        nodes.push(Node::new(*target, *target));
    }
    let mut store = GraphStore::with_root(ROOT_ID);
    store.replace(
        nodes,
        edges
            .iter()
            .map(|(source, target)| Edge::new(source, target))
            .collect(),
    );
    store
}

/// Store with explicit `(id, label)` nodes and `(source, target)` edges.
pub fn labeled_store(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> GraphStore {
    let mut store = GraphStore::with_root(ROOT_ID);
    store.replace(
        nodes
            .iter()
            .map(|(id, label)| Node::new(*id, *label))
            .collect(),
        edges
            .iter()
            .map(|(source, target)| Edge::new(source, target))
            .collect(),
    );
    store
}

/// Layout stub: the n-th node's center is `(n * 100, 0)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedEngine;

impl LayoutEngine for FixedEngine {
    fn layout(&self, request: &LayoutRequest<'_>) -> HashMap<String, Position> {
        request
            .node_ids
            .iter()
            .enumerate()
            .map(|(i, id)| {
                (
                    id.to_string(),
                    Position {
                        x: i as f64 * 100.0,
                        y: 0.0,
                    },
                )
            })
            .collect()
    }
}

/// Session on the fixed layout stub with sequential ids starting at 2.
pub fn session() -> Session<FixedEngine> {
    session_with(MindmapConfig::default())
}

pub fn session_with(config: MindmapConfig) -> Session<FixedEngine> {
    Session::new(FixedEngine, config, Box::new(SequentialIds::starting_at(2)))
}

/// Answers confirmations from a script; declines once the script runs out.
#[derive(Debug, Default)]
pub struct ScriptedConfirm {
    answers: VecDeque<bool>,
    pub asked: Vec<String>,
}

impl ScriptedConfirm {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

impl Confirm for ScriptedConfirm {
    fn confirm(&mut self, message: &str) -> bool {
        self.asked.push(message.to_string());
        self.answers.pop_front().unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct RecordingViewport {
    pub requests: Vec<FitRequest>,
    pub fail: bool,
}

impl Viewport for RecordingViewport {
    fn fit_view(&mut self, request: &FitRequest) -> Result<()> {
        if self.fail {
            return Err(anyhow!("viewport unavailable"));
        }
        self.requests.push(request.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingAdQueue {
    pub requests: Vec<AdSlotRequest>,
}

impl AdQueue for RecordingAdQueue {
    fn register_ad_slot(&mut self, request: &AdSlotRequest) {
        self.requests.push(request.clone());
    }
}

/// Keeps saved artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub saved: Vec<(String, Vec<u8>)>,
}

impl ArtifactSink for MemorySink {
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.saved.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
