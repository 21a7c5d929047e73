//! Host collaborators the session talks to at its edges.
//!
//! The [`Confirm`], [`Viewport`], and [`ArtifactSink`] traits decouple the editing
//! session from the surface it runs in. The terminal implementations here back
//! the `mindmap edit` loop; tests use the recording doubles from
//! `test_support`.

use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, instrument};

use crate::core::layout::FitRequest;

/// Blocking yes/no question put to the user before destructive operations.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Renderer view that can frame a set of boxes. Best effort: callers ignore
/// failures.
pub trait Viewport {
    fn fit_view(&mut self, request: &FitRequest) -> Result<()>;
}

/// "Save file" primitive for exported artifacts.
pub trait ArtifactSink {
    /// Deliver `bytes` under `file_name`; returns where it ended up.
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// Asks on `writer` and reads the answer as the next line of `reader`.
/// Only `y`/`yes` (any case) confirms; end of input declines.
pub struct LineConfirm<'a, R, W> {
    reader: &'a mut R,
    writer: &'a mut W,
}

impl<'a, R: BufRead, W: Write> LineConfirm<'a, R, W> {
    pub fn new(reader: &'a mut R, writer: &'a mut W) -> Self {
        Self { reader, writer }
    }
}

impl<R: BufRead, W: Write> Confirm for LineConfirm<'_, R, W> {
    fn confirm(&mut self, message: &str) -> bool {
        if write!(self.writer, "{} [y/N] ", message)
            .and_then(|()| self.writer.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match self.reader.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

/// A terminal has no canvas to frame; the request is only traced.
#[derive(Debug, Default)]
pub struct TracingViewport;

impl Viewport for TracingViewport {
    fn fit_view(&mut self, request: &FitRequest) -> Result<()> {
        debug!(
            min_x = request.bounds.min_x,
            min_y = request.bounds.min_y,
            max_x = request.bounds.max_x,
            max_y = request.bounds.max_y,
            duration_ms = request.duration_ms,
            "fit view"
        );
        Ok(())
    }
}

/// Saves artifacts as files inside a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ArtifactSink for DirectorySink {
    #[instrument(skip(self, bytes), fields(dir = %self.dir.display(), len = bytes.len()))]
    fn save(&mut self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create directory {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "artifact saved");
        Ok(path)
    }
}
