//! Editor configuration stored as TOML.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::layout::LayoutSpacing;
use crate::graph::Orientation;

/// What toggling the orientation does to the current graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrientationSwitch {
    /// Discard the graph and start over from a fresh root.
    #[default]
    Reset,
    /// Keep the graph and lay it out again in the new orientation.
    Relayout,
}

/// Editor configuration (TOML).
///
/// Missing fields fall back to the defaults the editor ships with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MindmapConfig {
    /// Orientation a new session starts in.
    pub default_orientation: Orientation,

    pub orientation_switch: OrientationSwitch,

    /// Label given to the root and to every newly inserted node.
    pub default_label: String,

    /// Duration hint passed along with fit-view requests.
    pub fit_view_duration_ms: u64,

    /// File name of the CSV outline artifact.
    pub csv_file_name: String,

    pub layout: LayoutSpacing,

    pub ad: AdConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdConfig {
    pub unit: String,
    pub width: u32,
    pub height: u32,
    pub disabled: bool,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            unit: String::new(),
            width: 320,
            height: 50,
            disabled: true,
        }
    }
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            default_orientation: Orientation::Horizontal,
            orientation_switch: OrientationSwitch::Reset,
            default_label: "New thought".to_string(),
            fit_view_duration_ms: 300,
            csv_file_name: "mindmap.csv".to_string(),
            layout: LayoutSpacing::default(),
            ad: AdConfig::default(),
        }
    }
}

impl MindmapConfig {
    pub fn validate(&self) -> Result<()> {
        let spacing = &self.layout;
        if !(spacing.node_width > 0.0 && spacing.node_height > 0.0) {
            return Err(anyhow!("layout.node_width and layout.node_height must be > 0"));
        }
        if !(spacing.node_separation >= 0.0 && spacing.rank_separation >= 0.0) {
            return Err(anyhow!(
                "layout.node_separation and layout.rank_separation must be >= 0"
            ));
        }
        if self.csv_file_name.trim().is_empty() {
            return Err(anyhow!("csv_file_name must be non-empty"));
        }
        if !self.ad.disabled && self.ad.unit.trim().is_empty() {
            return Err(anyhow!("ad.unit must be set when ads are enabled"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `MindmapConfig::default()`.
pub fn load_config(path: &Path) -> Result<MindmapConfig> {
    if !path.exists() {
        let cfg = MindmapConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: MindmapConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &MindmapConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
