//! Editing session: the graph store plus everything layered on top of it.
//!
//! A session owns the store, the orientation, the selection cursor, and the
//! derived positions. Every structural change goes through [`Session::apply`],
//! which swaps the store contents in one step and recomputes the layout, so
//! positions are never stale and never patched incrementally.

use tracing::{debug, info, instrument, warn};

use crate::core::ids::IdSource;
use crate::core::layout::{FitRequest, LayoutAdapter, LayoutEngine};
use crate::core::navigator::{Direction, next_selection};
use crate::core::outline::OutlineTable;
use crate::core::tree_ops::{self, TreeEdit};
use crate::error::MindmapError;
use crate::graph::{GraphStore, Orientation, PositionedNode, ROOT_ID};
use crate::io::config::{MindmapConfig, OrientationSwitch};
use crate::io::document::{MindmapDocument, decode_document, encode_document};
use crate::io::host::{ArtifactSink, Confirm, Viewport};

pub const RESET_PROMPT: &str = "Delete everything and start over?";
pub const ORIENTATION_RESET_PROMPT: &str =
    "Changing the layout direction clears the current mindmap. Continue?";

/// One-shot request for the renderer to open the label editor on a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    pub node_id: String,
}

/// Exported CSV outline ready for the "save file" collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub struct Session<E> {
    store: GraphStore,
    orientation: Orientation,
    selection: Option<String>,
    positioned: Vec<PositionedNode>,
    adapter: LayoutAdapter<E>,
    ids: Box<dyn IdSource>,
    config: MindmapConfig,
    pending_fit: Option<FitRequest>,
    edit_request: Option<EditRequest>,
}

impl<E: LayoutEngine> Session<E> {
    /// Start with a lone root in the configured default orientation.
    pub fn new(engine: E, config: MindmapConfig, ids: Box<dyn IdSource>) -> Self {
        let mut session = Self {
            store: GraphStore::with_root(&config.default_label),
            orientation: config.default_orientation,
            selection: None,
            positioned: Vec::new(),
            adapter: LayoutAdapter::new(engine, config.layout),
            ids,
            config,
            pending_fit: None,
            edit_request: None,
        };
        session.relayout();
        session
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn positioned(&self) -> &[PositionedNode] {
        &self.positioned
    }

    pub fn config(&self) -> &MindmapConfig {
        &self.config
    }

    /// Make `id` the only selected node.
    pub fn select(&mut self, id: &str) -> Result<(), MindmapError> {
        if !self.store.contains(id) {
            return Err(MindmapError::UnknownNode(id.to_string()));
        }
        self.selection = Some(id.to_string());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Add a child under the selection; returns the new node id.
    #[instrument(skip(self))]
    pub fn insert_child(&mut self) -> Result<String, MindmapError> {
        let new_id = self.fresh_id();
        let edit = tree_ops::insert_child(
            &self.store,
            self.selection.as_deref(),
            new_id,
            &self.config.default_label,
        )?;
        Ok(self.apply_insert(edit))
    }

    /// Add a sibling after the selection's existing siblings; returns the new
    /// node id.
    #[instrument(skip(self))]
    pub fn insert_sibling(&mut self) -> Result<String, MindmapError> {
        let new_id = self.fresh_id();
        let edit = tree_ops::insert_sibling(
            &self.store,
            self.selection.as_deref(),
            new_id,
            &self.config.default_label,
        )?;
        Ok(self.apply_insert(edit))
    }

    /// Next generated id not already held by a node. Imported documents may
    /// carry ids the generator has not reached yet.
    fn fresh_id(&mut self) -> String {
        loop {
            let id = self.ids.next_id();
            if !self.store.contains(&id) {
                return id;
            }
            debug!(id, "generated id already in use");
        }
    }

    fn apply_insert(&mut self, edit: TreeEdit) -> String {
        let created = edit.created.clone().unwrap_or_default();
        self.apply(edit);
        info!(id = %created, "node inserted");
        created
    }

    /// Delete the selected node's subtree. Returns the removed ids; nothing is
    /// removed when there is no selection.
    pub fn delete_selected(&mut self) -> Result<Vec<String>, MindmapError> {
        match self.selection.clone() {
            Some(id) => self.delete_subtree(&id),
            None => Ok(Vec::new()),
        }
    }

    /// Delete `id` and all of its descendants; the parent becomes selected.
    #[instrument(skip(self))]
    pub fn delete_subtree(&mut self, id: &str) -> Result<Vec<String>, MindmapError> {
        let edit = tree_ops::delete_subtree(&self.store, id)?;
        let removed = edit.removed.clone();
        if self
            .edit_request
            .as_ref()
            .is_some_and(|request| removed.contains(&request.node_id))
        {
            self.edit_request = None;
        }
        self.apply(edit);
        info!(removed = removed.len(), "subtree deleted");
        Ok(removed)
    }

    /// Replace everything with a fresh root once the user confirms. Returns
    /// whether the reset happened.
    pub fn reset_all(&mut self, confirm: &mut dyn Confirm) -> bool {
        if !confirm.confirm(RESET_PROMPT) {
            debug!("reset declined");
            return false;
        }
        self.reset_graph();
        true
    }

    fn reset_graph(&mut self) {
        self.selection = None;
        self.edit_request = None;
        self.apply(tree_ops::reset(&self.config.default_label));
        info!("graph reset");
    }

    /// Flip the orientation. In `reset` mode the user must confirm because the
    /// graph is discarded; `relayout` mode keeps the graph. Returns whether
    /// the orientation changed.
    pub fn toggle_orientation(&mut self, confirm: &mut dyn Confirm) -> bool {
        let next = self.orientation.toggled();
        match self.config.orientation_switch {
            OrientationSwitch::Reset => {
                if !confirm.confirm(ORIENTATION_RESET_PROMPT) {
                    debug!("orientation change declined");
                    return false;
                }
                self.orientation = next;
                self.reset_graph();
            }
            OrientationSwitch::Relayout => {
                self.orientation = next;
                self.relayout();
            }
        }
        info!(orientation = next.as_str(), "orientation changed");
        true
    }

    /// Move the selection by an arrow key. Returns the newly selected id, or
    /// `None` when the selection stays where it is.
    pub fn navigate(&mut self, direction: Direction) -> Option<String> {
        let target = next_selection(
            self.store.nodes(),
            self.store.edges(),
            self.selection.as_deref(),
            direction,
            self.orientation,
        )?;
        self.selection = Some(target.clone());
        Some(target)
    }

    /// Ask the renderer to open the label editor on the selection.
    pub fn request_edit(&mut self) -> Result<EditRequest, MindmapError> {
        let id = self.selection.clone().ok_or(MindmapError::NoSelection)?;
        let request = EditRequest { node_id: id };
        self.edit_request = Some(request.clone());
        Ok(request)
    }

    /// Consume the pending edit request, if any.
    pub fn take_edit_request(&mut self) -> Option<EditRequest> {
        self.edit_request.take()
    }

    /// Commit an edited label. Structure is unchanged, so positions are kept.
    pub fn set_label(&mut self, id: &str, label: &str) -> Result<(), MindmapError> {
        if !self.store.contains(id) {
            return Err(MindmapError::UnknownNode(id.to_string()));
        }
        let nodes = self
            .store
            .nodes()
            .iter()
            .map(|node| {
                let mut node = node.clone();
                if node.id == id {
                    node.label = label.to_string();
                }
                node
            })
            .collect();
        let edges = self.store.edges().to_vec();
        self.store.replace(nodes, edges);
        if let Some(positioned) = self.positioned.iter_mut().find(|node| node.id == id) {
            positioned.label = label.to_string();
        }
        debug!(id, "label updated");
        Ok(())
    }

    /// Structural text of the whole mindmap.
    pub fn export_text(&self) -> Result<String, MindmapError> {
        let document =
            MindmapDocument::from_graph(self.orientation, &self.positioned, self.store.edges());
        encode_document(&document)
    }

    /// Replace the mindmap with pasted structural text. On any error the
    /// current graph is left untouched.
    #[instrument(skip_all, fields(len = text.len()))]
    pub fn import_text(&mut self, text: &str) -> Result<(), MindmapError> {
        let imported = decode_document(text).inspect_err(|err| warn!(%err, "import rejected"))?;
        self.orientation = imported.orientation;
        self.selection = None;
        self.edit_request = None;
        self.apply(TreeEdit {
            nodes: imported.nodes,
            edges: imported.edges,
            select: None,
            created: None,
            removed: Vec::new(),
        });
        info!(
            nodes = self.store.nodes().len(),
            orientation = self.orientation.as_str(),
            "mindmap imported"
        );
        Ok(())
    }

    /// Hierarchical CSV outline of the tree. Refused for the untouched default
    /// graph.
    pub fn export_csv(&self) -> Result<CsvArtifact, MindmapError> {
        if self.store.is_pristine(&self.config.default_label) {
            return Err(MindmapError::EmptyExport);
        }
        let table = OutlineTable::from_graph(self.store.nodes(), self.store.edges(), ROOT_ID);
        Ok(CsvArtifact {
            file_name: self.config.csv_file_name.clone(),
            bytes: table.to_csv()?,
        })
    }

    /// Export the CSV outline and hand it to `sink`.
    pub fn save_csv(&self, sink: &mut dyn ArtifactSink) -> anyhow::Result<std::path::PathBuf> {
        let artifact = self.export_csv()?;
        sink.save(&artifact.file_name, &artifact.bytes)
    }

    /// The fit-view request queued by the last layout, if not yet taken.
    pub fn take_fit_request(&mut self) -> Option<FitRequest> {
        self.pending_fit.take()
    }

    /// Hand the queued fit-view request to the viewport after a render pass.
    /// Failures are ignored.
    pub fn flush_fit(&mut self, viewport: &mut dyn Viewport) {
        if let Some(request) = self.take_fit_request() {
            if let Err(err) = viewport.fit_view(&request) {
                debug!(%err, "fit view failed");
            }
        }
    }

    /// Apply a structural edit atomically and recompute positions.
    fn apply(&mut self, edit: TreeEdit) {
        self.store.replace(edit.nodes, edit.edges);
        if let Some(select) = edit.select {
            self.selection = Some(select);
        }
        if self
            .selection
            .as_deref()
            .is_some_and(|id| !self.store.contains(id))
        {
            self.selection = None;
        }
        self.relayout();
    }

    fn relayout(&mut self) {
        self.positioned =
            self.adapter
                .layout(self.store.nodes(), self.store.edges(), self.orientation);
        self.pending_fit = FitRequest::covering(
            &self.positioned,
            &self.adapter.spacing(),
            self.config.fit_view_duration_ms,
        );
    }
}
