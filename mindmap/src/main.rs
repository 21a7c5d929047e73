//! Keyboard-driven mindmap editor.
//!
//! `mindmap edit` runs the interactive loop on stdin/stdout. The other
//! subcommands work on exported mindmap text files: render the CSV outline,
//! print the computed layout, or check a document before importing it.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use mindmap::core::ids::ClockIds;
use mindmap::core::layered::LayeredTreeEngine;
use mindmap::error::MindmapError;
use mindmap::exit_codes;
use mindmap::io::ad::{AdSlot, TracingAdQueue};
use mindmap::io::config::{MindmapConfig, load_config, write_config};
use mindmap::io::document::decode_document;
use mindmap::io::host::{DirectorySink, TracingViewport};
use mindmap::logging;
use mindmap::repl::run_repl;
use mindmap::session::Session;

const DEFAULT_CONFIG: &str = "mindmap.toml";

#[derive(Parser)]
#[command(name = "mindmap", version, about = "Keyboard-driven mindmap editor")]
struct Cli {
    /// Editor config (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Edit a mindmap interactively, one key or command per line.
    Edit {
        /// Exported mindmap text to start from.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Directory the CSV outline is saved into.
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Write the hierarchical CSV outline of an exported mindmap.
    Csv {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Print the computed node positions of an exported mindmap as JSON.
    Layout {
        #[arg(long)]
        input: PathBuf,
    },
    /// Check exported mindmap text against the schema and tree invariants.
    Validate {
        #[arg(long)]
        input: PathBuf,
    },
    /// Write a config file with every setting at its default.
    InitConfig {
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Edit { input, out_dir } => cmd_edit(&cli.config, input.as_deref(), out_dir),
        Command::Csv { input, out_dir } => cmd_csv(&cli.config, &input, out_dir),
        Command::Layout { input } => cmd_layout(&cli.config, &input),
        Command::Validate { input } => cmd_validate(&input),
        Command::InitConfig { path, force } => cmd_init_config(&path, force),
    }
}

fn new_session(config: MindmapConfig) -> Session<LayeredTreeEngine> {
    Session::new(LayeredTreeEngine, config, Box::new(ClockIds::default()))
}

/// Session loaded from an exported mindmap file.
fn session_from_file(config_path: &Path, input: &Path) -> Result<Session<LayeredTreeEngine>> {
    let config = load_config(config_path)?;
    let text = read_input(input)?;
    let mut session = new_session(config);
    session
        .import_text(&text)
        .with_context(|| format!("import {}", input.display()))?;
    Ok(session)
}

fn read_input(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn cmd_edit(config_path: &Path, input: Option<&Path>, out_dir: PathBuf) -> Result<i32> {
    let mut session = match input {
        Some(input) => session_from_file(config_path, input)?,
        None => new_session(load_config(config_path)?),
    };

    let mut ad_slot = AdSlot::from_config(&session.config().ad);
    ad_slot.mount(&mut TracingAdQueue);

    let mut sink = DirectorySink::new(out_dir);
    let mut viewport = TracingViewport;
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    writeln!(writer, "mindmap editor; 'help' lists keys and commands")?;

    let summary = run_repl(
        &mut session,
        &mut reader,
        &mut writer,
        &mut sink,
        &mut viewport,
    )?;
    info!(
        commands = summary.commands,
        warnings = summary.warnings,
        "editor closed"
    );
    Ok(exit_codes::OK)
}

fn cmd_csv(config_path: &Path, input: &Path, out_dir: PathBuf) -> Result<i32> {
    let session = session_from_file(config_path, input)?;
    let mut sink = DirectorySink::new(out_dir);
    match session.save_csv(&mut sink) {
        Ok(path) => {
            println!("{}", path.display());
            Ok(exit_codes::OK)
        }
        Err(err) if matches!(
            err.downcast_ref::<MindmapError>(),
            Some(MindmapError::EmptyExport)
        ) => {
            eprintln!("{}", err);
            Ok(exit_codes::EMPTY_EXPORT)
        }
        Err(err) => Err(err),
    }
}

fn cmd_layout(config_path: &Path, input: &Path) -> Result<i32> {
    let session = session_from_file(config_path, input)?;
    let payload =
        serde_json::to_string_pretty(session.positioned()).context("serialize layout json")?;
    println!("{}", payload);
    Ok(exit_codes::OK)
}

fn cmd_validate(input: &Path) -> Result<i32> {
    let text = read_input(input)?;
    match decode_document(&text) {
        Ok(graph) => {
            println!(
                "ok: {} node(s), {}",
                graph.nodes.len(),
                graph.orientation.as_str()
            );
            Ok(exit_codes::OK)
        }
        Err(err) => {
            eprintln!("{}", err);
            Ok(exit_codes::INVALID)
        }
    }
}

fn cmd_init_config(path: &Path, force: bool) -> Result<i32> {
    if !force && path.exists() {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    write_config(path, &MindmapConfig::default())?;
    println!("{}", path.display());
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_edit_defaults() {
        let cli = Cli::parse_from(["mindmap", "edit"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG));
        match cli.command {
            Command::Edit { input, out_dir } => {
                assert!(input.is_none());
                assert_eq!(out_dir, PathBuf::from("."));
            }
            _ => panic!("expected edit"),
        }
    }

    #[test]
    fn parse_csv_with_global_config() {
        let cli = Cli::parse_from([
            "mindmap",
            "csv",
            "--input",
            "map.json",
            "--config",
            "alt.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(cli.command, Command::Csv { .. }));
    }

    #[test]
    fn parse_init_config_force() {
        let cli = Cli::parse_from(["mindmap", "init-config", "m.toml", "--force"]);
        assert!(matches!(cli.command, Command::InitConfig { force: true, .. }));
    }

    #[test]
    fn csv_requires_input() {
        assert!(Cli::try_parse_from(["mindmap", "csv"]).is_err());
    }
}
