//! Structural text codec: the full-fidelity JSON form of a mindmap.
//!
//! Export writes orientation, nodes (with their current positions) and edges.
//! Import checks the document against the embedded JSON Schema, then against
//! the tree invariants, and only then hands back a graph to apply. A rejected
//! document never reaches the store.

use std::sync::LazyLock;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_graph;
use crate::error::MindmapError;
use crate::graph::{Edge, Node, Orientation, Position, PositionedNode, ROOT_ID, edge_id};

const MINDMAP_SCHEMA: &str = include_str!("../../schemas/mindmap/v1.schema.json");

/// Renderer node type recorded on every exported node.
pub const NODE_TYPE: &str = "mindmapNode";

static VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    let schema: Value =
        serde_json::from_str(MINDMAP_SCHEMA).expect("embedded mindmap schema should be json");
    jsonschema::validator_for(&schema).expect("embedded mindmap schema should compile")
});

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MindmapDocument {
    pub layout_direction: Orientation,
    pub nodes: Vec<DocumentNode>,
    pub edges: Vec<DocumentEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentNode {
    pub id: String,
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,
    pub data: NodeData,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeData {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentEdge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

fn default_node_type() -> String {
    NODE_TYPE.to_string()
}

/// Graph recovered from a valid document, ready to be applied atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedGraph {
    pub orientation: Orientation,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl MindmapDocument {
    pub fn from_graph(orientation: Orientation, nodes: &[PositionedNode], edges: &[Edge]) -> Self {
        Self {
            layout_direction: orientation,
            nodes: nodes
                .iter()
                .map(|node| DocumentNode {
                    id: node.id.clone(),
                    node_type: default_node_type(),
                    data: NodeData {
                        label: node.label.clone(),
                        id: Some(node.id.clone()),
                    },
                    position: node.position,
                })
                .collect(),
            edges: edges
                .iter()
                .map(|edge| DocumentEdge {
                    id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                })
                .collect(),
        }
    }

    /// Convert to store data, rejecting documents that are not a single tree
    /// rooted at [`ROOT_ID`]. Stored positions are dropped; layout recomputes
    /// them.
    pub fn into_graph(self) -> Result<ImportedGraph, MindmapError> {
        let nodes: Vec<Node> = self
            .nodes
            .into_iter()
            .map(|node| Node::new(node.id, node.data.label))
            .collect();
        let edges: Vec<Edge> = self
            .edges
            .into_iter()
            .map(|edge| Edge {
                id: if edge.id.is_empty() {
                    edge_id(&edge.source, &edge.target)
                } else {
                    edge.id
                },
                source: edge.source,
                target: edge.target,
            })
            .collect();

        let errors = validate_graph(&nodes, &edges, ROOT_ID);
        if !errors.is_empty() {
            return Err(MindmapError::MalformedImport(errors.join("; ")));
        }
        Ok(ImportedGraph {
            orientation: self.layout_direction,
            nodes,
            edges,
        })
    }
}

/// Pretty-printed JSON text of `document`.
pub fn encode_document(document: &MindmapDocument) -> Result<String, MindmapError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Parse and validate pasted text (schema + tree invariants).
pub fn decode_document(text: &str) -> Result<ImportedGraph, MindmapError> {
    if text.trim().is_empty() {
        return Err(MindmapError::EmptyImport);
    }
    let value: Value = serde_json::from_str(text)
        .map_err(|err| MindmapError::MalformedImport(format!("parse json: {}", err)))?;

    let messages: Vec<String> = VALIDATOR
        .iter_errors(&value)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        return Err(MindmapError::MalformedImport(messages.join("; ")));
    }

    let document: MindmapDocument = serde_json::from_value(value)
        .map_err(|err| MindmapError::MalformedImport(format!("read document: {}", err)))?;
    debug!(
        nodes = document.nodes.len(),
        edges = document.edges.len(),
        "decoded mindmap document"
    );
    document.into_graph()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "layoutDirection": "vertical",
  "nodes": [
    { "id": "1", "type": "mindmapNode", "data": { "label": "Trip", "id": "1" }, "position": { "x": 0, "y": 0 } },
    { "id": "1718000000000", "type": "mindmapNode", "data": { "label": "Packing" }, "position": { "x": 10, "y": 200 } }
  ],
  "edges": [
    { "id": "e1-1718000000000", "source": "1", "target": "1718000000000", "animated": false }
  ]
}"#;

    #[test]
    fn decodes_documents_from_earlier_releases() {
        let graph = decode_document(SAMPLE).expect("decode");
        assert_eq!(graph.orientation, Orientation::Vertical);
        assert_eq!(
            graph.nodes,
            vec![Node::new("1", "Trip"), Node::new("1718000000000", "Packing")]
        );
        assert_eq!(graph.edges, vec![Edge::new("1", "1718000000000")]);
    }

    #[test]
    fn missing_top_level_field_is_malformed() {
        for text in [
            r#"{"nodes": [], "edges": []}"#,
            r#"{"layoutDirection": "horizontal", "edges": []}"#,
            r#"{"layoutDirection": "horizontal", "nodes": []}"#,
        ] {
            let err = decode_document(text).unwrap_err();
            assert!(matches!(err, MindmapError::MalformedImport(_)), "{text}");
        }
    }

    #[test]
    fn unparsable_and_empty_text_are_rejected() {
        assert!(matches!(
            decode_document("not json").unwrap_err(),
            MindmapError::MalformedImport(_)
        ));
        assert!(matches!(
            decode_document("   \n").unwrap_err(),
            MindmapError::EmptyImport
        ));
    }

    #[test]
    fn non_tree_documents_are_rejected() {
        let text = r#"{
          "layoutDirection": "horizontal",
          "nodes": [
            { "id": "1", "data": { "label": "R" } },
            { "id": "2", "data": { "label": "orphan" } }
          ],
          "edges": []
        }"#;
        let err = decode_document(text).unwrap_err();
        let MindmapError::MalformedImport(message) = err else {
            panic!("expected malformed import");
        };
        assert!(message.contains("'2' is not reachable"));
    }

    #[test]
    fn missing_edge_id_is_derived() {
        let text = r#"{
          "layoutDirection": "horizontal",
          "nodes": [
            { "id": "1", "data": { "label": "R" } },
            { "id": "2", "data": { "label": "C" } }
          ],
          "edges": [{ "source": "1", "target": "2" }]
        }"#;
        let graph = decode_document(text).expect("decode");
        assert_eq!(graph.edges[0].id, "e1-2");
    }

    #[test]
    fn exported_nodes_carry_type_and_position() {
        let nodes = vec![PositionedNode {
            id: ROOT_ID.to_string(),
            label: "R".to_string(),
            position: Position { x: -90.0, y: -25.0 },
        }];
        let doc = MindmapDocument::from_graph(Orientation::Horizontal, &nodes, &[]);
        let text = encode_document(&doc).expect("encode");
        let value: Value = serde_json::from_str(&text).expect("json");

        assert_eq!(value["layoutDirection"], "horizontal");
        assert_eq!(value["nodes"][0]["type"], NODE_TYPE);
        assert_eq!(value["nodes"][0]["data"]["id"], ROOT_ID);
        assert_eq!(value["nodes"][0]["position"]["x"], -90.0);
    }
}
