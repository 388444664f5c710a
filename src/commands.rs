// ── Command dispatch ──────────────────────────────────────────────────────────
//
// Translates UI commands (menu items, accelerators, dialog results) into calls
// on `App`.  Nothing here touches a window: the host renders the `Outcome`.
//
// Failures never escape `dispatch`: document I/O errors become error
// notices, "not found" becomes an informational notice, and a cancelled
// dialog (a `None` argument) is a no-op.

use std::path::PathBuf;

use crate::{app::App, settings::Preferences};

/// Every command the editor's menus and accelerators expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    /// `force` discards unsaved changes without asking.
    New { force: bool },
    /// `path` is `None` when the Open dialog was cancelled.
    Open { path: Option<PathBuf>, force: bool },
    Save,
    /// `None` when the Save As dialog was cancelled.
    SaveAs(Option<PathBuf>),
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    Find(String),
    FindNext,
    FindPrevious,
    Replace { query: String, replacement: String },
    ReplaceAll { query: String, replacement: String },
    /// `None` when the Go To Line dialog was cancelled.
    GoToLine(Option<usize>),
    ZoomIn,
    ZoomOut,
    ZoomReset,
    ToggleWordWrap,
    ToggleStatusBar,
    /// Result of the font picker.
    SetFont { family: String, size: u32 },
    /// Reported by the host when the window is moved or resized.
    SetWindowGeometry(String),
    Exit { force: bool },
}

/// Operations the host's text widget performs natively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HostAction {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Info,
    Error,
}

/// A message for the user.  Errors are shown as blocking notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) kind: NoticeKind,
    pub(crate) message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    fn not_found(query: &str) -> Self {
        Self::info(format!("Cannot find \"{query}\""))
    }
}

/// What the host should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// Nothing changed (cancelled dialog, limit reached, no stored search).
    Nothing,
    /// Document, selection or preferences changed; refresh the view.
    Updated,
    Notice(Notice),
    /// Perform the action on the host widget.
    Host(HostAction),
    /// The document has no path yet; show the Save As dialog.
    PromptSaveAs,
    /// The document has unsaved changes; ask before repeating with `force`.
    ConfirmDiscard,
    /// Preferences are flushed; close the session.
    Exit,
}

fn updated_if(changed: bool) -> Outcome {
    if changed {
        Outcome::Updated
    } else {
        Outcome::Nothing
    }
}

/// Run one command against the session.
pub(crate) fn dispatch(app: &mut App, command: Command) -> Outcome {
    log::debug!("dispatch {command:?}");
    match command {
        Command::New { force } => {
            if app.doc.dirty && !force {
                return Outcome::ConfirmDiscard;
            }
            app.new_document();
            Outcome::Updated
        }
        Command::Open { path, force } => {
            let Some(path) = path else {
                return Outcome::Nothing;
            };
            if app.doc.dirty && !force {
                return Outcome::ConfirmDiscard;
            }
            match app.open(path) {
                Ok(()) => Outcome::Updated,
                Err(e) => Outcome::Notice(Notice::error(format!("Could not open file:\n{e}"))),
            }
        }
        Command::Save => match app.doc.path.clone() {
            Some(path) => save(app, path),
            None => Outcome::PromptSaveAs,
        },
        Command::SaveAs(path) => match path {
            Some(path) => save(app, path),
            None => Outcome::Nothing,
        },

        Command::Undo => Outcome::Host(HostAction::Undo),
        Command::Redo => Outcome::Host(HostAction::Redo),
        Command::Cut => Outcome::Host(HostAction::Cut),
        Command::Copy => Outcome::Host(HostAction::Copy),
        Command::Paste => Outcome::Host(HostAction::Paste),
        Command::SelectAll => {
            app.buffer.select_all();
            Outcome::Updated
        }

        Command::Find(query) => {
            if query.is_empty() {
                return Outcome::Nothing;
            }
            match app.find(&query, true) {
                Some(_) => Outcome::Updated,
                None => Outcome::Notice(Notice::not_found(&query)),
            }
        }
        Command::FindNext => find_again(app, true),
        Command::FindPrevious => find_again(app, false),
        Command::Replace { query, replacement } => {
            if query.is_empty() {
                return Outcome::Nothing;
            }
            let step = app.replace(&query, &replacement);
            if step.replaced || step.next.is_some() {
                Outcome::Updated
            } else {
                Outcome::Notice(Notice::not_found(&query))
            }
        }
        Command::ReplaceAll { query, replacement } => {
            if query.is_empty() {
                return Outcome::Nothing;
            }
            match app.replace_all(&query, &replacement) {
                0 => Outcome::Notice(Notice::not_found(&query)),
                1 => Outcome::Notice(Notice::info("Replaced 1 occurrence.")),
                n => Outcome::Notice(Notice::info(format!("Replaced {n} occurrences."))),
            }
        }
        Command::GoToLine(line) => {
            let Some(line) = line else {
                return Outcome::Nothing;
            };
            match app.go_to_line(line) {
                Ok(()) => Outcome::Updated,
                Err(e) => Outcome::Notice(Notice::error(format!("Go To Line: {e}"))),
            }
        }

        Command::ZoomIn => updated_if(app.update_prefs(Preferences::zoom_in)),
        Command::ZoomOut => updated_if(app.update_prefs(Preferences::zoom_out)),
        Command::ZoomReset => updated_if(app.update_prefs(Preferences::zoom_reset)),
        Command::ToggleWordWrap => updated_if(app.update_prefs(|p| {
            p.word_wrap = !p.word_wrap;
            true
        })),
        Command::ToggleStatusBar => updated_if(app.update_prefs(|p| {
            p.show_status_bar = !p.show_status_bar;
            true
        })),
        Command::SetFont { family, size } => updated_if(app.update_prefs(|p| {
            let family = family.trim();
            let family_changed = !family.is_empty() && family != p.font_family;
            if family_changed {
                p.font_family = family.to_owned();
            }
            p.set_font_size(size) || family_changed
        })),
        Command::SetWindowGeometry(geometry) => updated_if(app.update_prefs(|p| {
            let changed = p.window_geometry != geometry;
            p.window_geometry = geometry;
            changed
        })),

        Command::Exit { force } => {
            if app.doc.dirty && !force {
                return Outcome::ConfirmDiscard;
            }
            app.persist_prefs();
            Outcome::Exit
        }
    }
}

/// Repeat the stored search; a no-op when nothing has been searched yet.
fn find_again(app: &mut App, forward: bool) -> Outcome {
    let Some(query) = app.last_search().map(|s| s.text.clone()) else {
        return Outcome::Nothing;
    };
    match app.repeat_search(forward) {
        Some(_) => Outcome::Updated,
        None => Outcome::Notice(Notice::not_found(&query)),
    }
}

fn save(app: &mut App, path: PathBuf) -> Outcome {
    match app.save_to(path) {
        Ok(()) => Outcome::Updated,
        Err(e) => Outcome::Notice(Notice::error(format!("Could not save file:\n{e}"))),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
