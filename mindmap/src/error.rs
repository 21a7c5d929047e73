//! User-facing errors raised by editing, import, and export operations.
//!
//! Every variant aborts the operation before the graph is touched, so the
//! message can be shown to the user and the session continues unchanged.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MindmapError {
    #[error("select a node first")]
    NoSelection,

    #[error("the central node cannot be deleted")]
    RootUndeletable,

    #[error("the central node cannot have a sibling")]
    RootHasNoSibling,

    #[error("unknown node: {0}")]
    UnknownNode(String),

    #[error("nothing to import: paste the exported text first")]
    EmptyImport,

    #[error("malformed mindmap data: {0}")]
    MalformedImport(String),

    #[error("nothing to export")]
    EmptyExport,

    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialize mindmap: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl MindmapError {
    /// True for errors that only guide the user (wrong selection, root
    /// restrictions) as opposed to bad input data.
    pub fn is_user_guidance(&self) -> bool {
        matches!(
            self,
            MindmapError::NoSelection
                | MindmapError::RootUndeletable
                | MindmapError::RootHasNoSibling
                | MindmapError::UnknownNode(_)
        )
    }
}
