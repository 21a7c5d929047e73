//! Line-driven editing loop for `mindmap edit`.
//!
//! Each input line is either a key chord from the keyboard surface (`Tab`,
//! `ArrowDown`, `Ctrl+S`, ...) or a command word. After every line the loop
//! acts as the renderer: it consumes pending edit requests and forwards the
//! queued fit-view request to the viewport.

use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::core::layout::LayoutEngine;
use crate::error::MindmapError;
use crate::graph::{ROOT_ID, child_edges};
use crate::io::host::{ArtifactSink, LineConfirm, Viewport};
use crate::keys::{KeyChord, KeyOutcome, action_for, dispatch};
use crate::session::Session;

/// Line that ends a pasted import block.
pub const IMPORT_TERMINATOR: &str = ".";
/// Line that cancels label editing.
pub const EDIT_CANCEL: &str = "Esc";

const HELP: &str = "\
keys:     Tab  Delete  Backspace  F2  ArrowUp  ArrowDown  ArrowLeft  ArrowRight  Ctrl+S  Ctrl+O
commands: select <id> | deselect | label <text> | sibling | reset | orientation | csv | export | import
          show | help | quit
import:   paste the exported text, then a line with a single '.'
editing:  type the new label and press Enter; 'Esc' cancels";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Key(KeyChord),
    Select(String),
    Deselect,
    Label(String),
    Sibling,
    Reset,
    Orientation,
    Csv,
    Export,
    Import,
    Show,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command> {
    let (word, arg) = match line.split_once(' ') {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };
    let command = match word {
        "select" if !arg.is_empty() => Command::Select(arg.to_string()),
        "deselect" => Command::Deselect,
        "label" => Command::Label(arg.to_string()),
        "sibling" => Command::Sibling,
        "reset" => Command::Reset,
        "orientation" => Command::Orientation,
        "csv" => Command::Csv,
        "export" => Command::Export,
        "import" => Command::Import,
        "show" => Command::Show,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "select" => bail!("usage: select <id>"),
        _ => Command::Key(
            line.parse()
                .with_context(|| format!("unknown command '{}' (try 'help')", line))?,
        ),
    };
    Ok(command)
}

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplSummary {
    pub commands: usize,
    pub warnings: usize,
}

/// Drive `session` from `reader` until end of input or `quit`.
pub fn run_repl<E, R, W>(
    session: &mut Session<E>,
    reader: &mut R,
    writer: &mut W,
    sink: &mut dyn ArtifactSink,
    viewport: &mut dyn Viewport,
) -> Result<ReplSummary>
where
    E: LayoutEngine,
    R: BufRead,
    W: Write,
{
    let mut summary = ReplSummary::default();
    loop {
        let Some(line) = read_line(reader)? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        summary.commands += 1;
        debug!(line, "repl input");

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                summary.warnings += 1;
                writeln!(writer, "! {:#}", err)?;
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        if let Err(err) = execute(session, command, reader, writer, sink) {
            summary.warnings += 1;
            writeln!(writer, "! {:#}", err)?;
        }

        // Render pass.
        if let Some(request) = session.take_edit_request() {
            edit_label(session, &request.node_id, reader, writer)?;
        }
        session.flush_fit(viewport);
    }
    Ok(summary)
}

fn execute<E, R, W>(
    session: &mut Session<E>,
    command: Command,
    reader: &mut R,
    writer: &mut W,
    sink: &mut dyn ArtifactSink,
) -> Result<()>
where
    E: LayoutEngine,
    R: BufRead,
    W: Write,
{
    match command {
        Command::Key(chord) => {
            let Some(action) = action_for(chord, false) else {
                bail!("unbound key {:?}", chord.key);
            };
            match dispatch(session, action)? {
                KeyOutcome::Inserted(id) => writeln!(writer, "added {}", id)?,
                KeyOutcome::Deleted(removed) => {
                    writeln!(writer, "deleted {} node(s)", removed.len())?;
                }
                KeyOutcome::EditRequested(_) | KeyOutcome::Ignored => {}
                KeyOutcome::Moved(Some(id)) => writeln!(writer, "selected {}", id)?,
                KeyOutcome::Moved(None) => {}
                KeyOutcome::Exported(text) => writeln!(writer, "{}", text)?,
                KeyOutcome::ImportRequested => import_block(session, reader, writer)?,
            }
        }
        Command::Select(id) => {
            session.select(&id)?;
            writeln!(writer, "selected {}", id)?;
        }
        Command::Deselect => session.clear_selection(),
        Command::Label(text) => {
            let id = session
                .selection()
                .ok_or(MindmapError::NoSelection)?
                .to_string();
            session.set_label(&id, &text)?;
        }
        Command::Sibling => {
            let id = session.insert_sibling()?;
            writeln!(writer, "added {}", id)?;
        }
        Command::Reset => {
            let mut confirm = LineConfirm::new(reader, writer);
            if session.reset_all(&mut confirm) {
                writeln!(writer, "reset")?;
            }
        }
        Command::Orientation => {
            let mut confirm = LineConfirm::new(reader, writer);
            if session.toggle_orientation(&mut confirm) {
                writeln!(writer, "orientation {}", session.orientation().as_str())?;
            }
        }
        Command::Csv => {
            let path = session.save_csv(sink)?;
            writeln!(writer, "saved {}", path.display())?;
        }
        Command::Export => writeln!(writer, "{}", session.export_text()?)?,
        Command::Import => import_block(session, reader, writer)?,
        Command::Show => render_tree(session, writer)?,
        Command::Help => writeln!(writer, "{}", HELP)?,
        Command::Quit => {}
    }
    Ok(())
}

/// Collect pasted lines up to [`IMPORT_TERMINATOR`] and import them.
fn import_block<E, R, W>(session: &mut Session<E>, reader: &mut R, writer: &mut W) -> Result<()>
where
    E: LayoutEngine,
    R: BufRead,
    W: Write,
{
    writeln!(writer, "paste mindmap text, end with '{}'", IMPORT_TERMINATOR)?;
    let mut text = String::new();
    while let Some(line) = read_line(reader)? {
        if line.trim() == IMPORT_TERMINATOR {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    session.import_text(&text)?;
    writeln!(writer, "imported {} node(s)", session.store().nodes().len())?;
    Ok(())
}

fn edit_label<E, R, W>(
    session: &mut Session<E>,
    id: &str,
    reader: &mut R,
    writer: &mut W,
) -> Result<()>
where
    E: LayoutEngine,
    R: BufRead,
    W: Write,
{
    let current = session
        .store()
        .node(id)
        .map(|node| node.label.clone())
        .unwrap_or_default();
    write!(writer, "label [{}]: ", current)?;
    writer.flush()?;
    match read_line(reader)? {
        Some(line) if line != EDIT_CANCEL => {
            session.set_label(id, &line)?;
        }
        _ => writeln!(writer, "edit cancelled")?,
    }
    Ok(())
}

/// Indented tree with the selection marked by `*`.
fn render_tree<E: LayoutEngine, W: Write>(session: &Session<E>, writer: &mut W) -> Result<()> {
    writeln!(writer, "[{}]", session.orientation().as_str())?;
    let mut stack = vec![(ROOT_ID.to_string(), 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let Some(node) = session.positioned().iter().find(|node| node.id == id) else {
            continue;
        };
        let marker = if session.selection() == Some(id.as_str()) {
            '*'
        } else {
            '-'
        };
        writeln!(
            writer,
            "{:indent$}{} {} {:?} ({:.0}, {:.0})",
            "",
            marker,
            node.id,
            node.label,
            node.position.x,
            node.position.y,
            indent = depth * 2
        )?;
        let children: Vec<String> = child_edges(session.store().edges(), &id)
            .map(|edge| edge.target.clone())
            .collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
    Ok(())
}

fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).context("read input")?;
    if read == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemorySink, RecordingViewport, session};
    use std::io::Cursor;

    fn run(script: &str) -> (Session<crate::test_support::FixedEngine>, String, MemorySink) {
        let mut s = session();
        let mut input = Cursor::new(script.to_string());
        let mut output = Vec::new();
        let mut sink = MemorySink::default();
        let mut viewport = RecordingViewport::default();
        run_repl(&mut s, &mut input, &mut output, &mut sink, &mut viewport).expect("repl");
        (s, String::from_utf8(output).expect("utf8"), sink)
    }

    #[test]
    fn parses_commands_and_chords() {
        assert_eq!(parse_command("select 12").expect("parse"), Command::Select("12".into()));
        assert_eq!(parse_command("label").expect("parse"), Command::Label(String::new()));
        assert!(matches!(parse_command("Tab").expect("parse"), Command::Key(_)));
        assert_eq!(parse_command("deselect").expect("parse"), Command::Deselect);
        assert!(parse_command("select").is_err());
        assert!(parse_command("frobnicate").is_err());
    }

    #[test]
    fn keys_edit_and_export_csv() {
        let script = "select 1\nF2\nTrip\nTab\nArrowRight\nF2\nPacking\ncsv\nquit\nTab\n";
        let (s, output, sink) = run(script);

        assert_eq!(s.store().nodes().len(), 2);
        assert_eq!(s.store().node("2").map(|n| n.label.as_str()), Some("Packing"));
        assert!(output.contains("added 2"));
        assert!(output.contains("selected 2"));
        assert_eq!(sink.saved.len(), 1);
        assert_eq!(sink.saved[0].0, "mindmap.csv");
        assert!(sink.saved[0].1.ends_with(b"\"Trip\",\"Packing\"\n"));
    }

    #[test]
    fn edit_can_be_cancelled() {
        let (s, output, _) = run("select 1\nF2\nEsc\n");
        assert_eq!(s.store().node(ROOT_ID).map(|n| n.label.as_str()), Some("New thought"));
        assert!(output.contains("edit cancelled"));
    }

    #[test]
    fn guidance_errors_are_reported_and_loop_continues() {
        let (s, output, sink) = run("Tab\ncsv\nselect 1\nDelete\nsibling\n");
        assert!(output.contains("! select a node first"));
        assert!(output.contains("! nothing to export"));
        assert!(output.contains("! the central node cannot be deleted"));
        assert!(output.contains("! the central node cannot have a sibling"));
        assert!(sink.saved.is_empty());
        assert_eq!(s.store().nodes().len(), 1);
    }

    #[test]
    fn reset_reads_confirmation_from_input() {
        let (s, _, _) = run("select 1\nTab\nreset\nn\n");
        assert_eq!(s.store().nodes().len(), 2);

        let (s, output, _) = run("select 1\nTab\nreset\ny\n");
        assert_eq!(s.store().nodes().len(), 1);
        assert!(output.contains("reset"));
    }

    #[test]
    fn export_then_import_round_trips_through_the_loop() {
        let (source, _, _) = run("select 1\nlabel Trip\nTab\nTab\n");
        let text = source.export_text().expect("export");

        let script = format!("Ctrl+O\n{}\n.\nshow\n", text);
        let (s, output, _) = run(&script);
        assert_eq!(s.store(), source.store());
        assert!(output.contains("imported 3 node(s)"));
        assert!(output.contains("- 1 \"Trip\""));
    }
}
