//! Stable exit codes for mindmap CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid input document or config, or any other error.
pub const INVALID: i32 = 1;
/// `mindmap csv` was given the untouched default mindmap.
pub const EMPTY_EXPORT: i32 = 2;
