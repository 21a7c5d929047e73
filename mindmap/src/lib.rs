//! Mindmap tree-editor core.
//!
//! A mindmap is a tree rooted at a fixed central node. Users grow it with
//! keyboard-driven inserts, walk it with the arrow keys, and move it in and
//! out as structural text or a hierarchical CSV outline. The architecture
//! keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (tree edits, navigation, layout,
//!   outline export). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting edges (config file, document codec, host
//!   collaborators such as confirmation prompts and file sinks).
//!
//! [`session::Session`] ties the two together; [`keys`] and [`repl`] drive a
//! session from keyboard input for the `mindmap edit` command.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod graph;
pub mod io;
pub mod keys;
pub mod logging;
pub mod repl;
pub mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
