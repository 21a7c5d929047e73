//! Deterministic, pure logic behind the editor.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! graph data and return deterministic outputs suitable for tests.

pub mod ids;
pub mod invariants;
pub mod layered;
pub mod layout;
pub mod navigator;
pub mod outline;
pub mod tree_ops;
