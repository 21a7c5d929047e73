//! I/O helpers and host collaborators for the editor.

pub mod ad;
pub mod config;
pub mod document;
pub mod host;
