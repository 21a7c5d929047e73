//! Global keyboard surface.
//!
//! Key chords are parsed from their conventional names (`Tab`, `ArrowUp`,
//! `Ctrl+S`, `Cmd+O`, ...), mapped to an [`KeyAction`], and dispatched against a
//! [`Session`]. Chords are ignored while a text input has focus.

use std::str::FromStr;

use anyhow::{Result, bail};

use crate::core::layout::LayoutEngine;
use crate::core::navigator::Direction;
use crate::error::MindmapError;
use crate::session::{EditRequest, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab,
    Delete,
    Backspace,
    F2,
    Arrow(Direction),
    Char(char),
}

/// A key plus whether the platform command modifier (Ctrl, or Cmd on macOS)
/// was held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub command: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
        }
    }
}

impl FromStr for KeyChord {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut command = false;
        let mut rest = s.trim();
        while let Some((modifier, tail)) = rest.split_once('+') {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "cmd" | "meta" => command = true,
                other => bail!("unknown modifier '{}'", other),
            }
            rest = tail;
        }

        let key = match rest {
            "Tab" => Key::Tab,
            "Delete" => Key::Delete,
            "Backspace" => Key::Backspace,
            "F2" => Key::F2,
            "ArrowUp" => Key::Arrow(Direction::Up),
            "ArrowDown" => Key::Arrow(Direction::Down),
            "ArrowLeft" => Key::Arrow(Direction::Left),
            "ArrowRight" => Key::Arrow(Direction::Right),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => bail!("unknown key '{}'", other),
                }
            }
        };
        Ok(Self { key, command })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    InsertChild,
    DeleteSelection,
    RequestEdit,
    Navigate(Direction),
    ExportText,
    OpenImport,
}

/// Action bound to `chord`, or `None` when it is unbound or a text input has
/// focus.
pub fn action_for(chord: KeyChord, input_focused: bool) -> Option<KeyAction> {
    if input_focused {
        return None;
    }
    match (chord.key, chord.command) {
        (Key::Arrow(direction), _) => Some(KeyAction::Navigate(direction)),
        (Key::Tab, _) => Some(KeyAction::InsertChild),
        (Key::Delete | Key::Backspace, _) => Some(KeyAction::DeleteSelection),
        (Key::F2, _) => Some(KeyAction::RequestEdit),
        (Key::Char('s' | 'S'), true) => Some(KeyAction::ExportText),
        (Key::Char('o' | 'O'), true) => Some(KeyAction::OpenImport),
        _ => None,
    }
}

/// What a dispatched key did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    Inserted(String),
    Deleted(Vec<String>),
    EditRequested(EditRequest),
    /// Selection moved to this node; `None` when it stayed put.
    Moved(Option<String>),
    Exported(String),
    ImportRequested,
    /// The key needs a selection and there is none.
    Ignored,
}

/// Run `action` against the session.
///
/// Delete and F2 without a selection are silently ignored; Tab without one is
/// a user-guidance error.
pub fn dispatch<E: LayoutEngine>(
    session: &mut Session<E>,
    action: KeyAction,
) -> Result<KeyOutcome, MindmapError> {
    let outcome = match action {
        KeyAction::InsertChild => KeyOutcome::Inserted(session.insert_child()?),
        KeyAction::DeleteSelection => {
            if session.selection().is_none() {
                return Ok(KeyOutcome::Ignored);
            }
            KeyOutcome::Deleted(session.delete_selected()?)
        }
        KeyAction::RequestEdit => match session.request_edit() {
            Ok(request) => KeyOutcome::EditRequested(request),
            Err(MindmapError::NoSelection) => KeyOutcome::Ignored,
            Err(err) => return Err(err),
        },
        KeyAction::Navigate(direction) => KeyOutcome::Moved(session.navigate(direction)),
        KeyAction::ExportText => KeyOutcome::Exported(session.export_text()?),
        KeyAction::OpenImport => KeyOutcome::ImportRequested,
    };
    Ok(outcome)
}
