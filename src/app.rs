// ── Application session & top-level state ──────────────────────────────────────
//
// A single `App` is created on startup and owned by the host for the lifetime
// of the session.  All mutations happen on the host's event thread; there is
// no global mutable state.  Every operation the command layer performs goes
// through a method here, so the whole session can be driven without a UI.

use std::path::{Path, PathBuf};

use crate::{
    editor::TextBuffer,
    error::{DuskError, Result},
    search::{
        replace::{replace_all, replace_one},
        MatchRange, SearchOptions,
    },
    settings::{Preferences, SettingsStore},
};

/// Application name shown in the title bar.
pub(crate) const APP_NAME: &str = "Dusk";

// ── File I/O ──────────────────────────────────────────────────────────────────

/// Read a document from disk.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing.
pub(crate) fn read_document(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DuskError::file(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write `text` to `path` verbatim, replacing any existing content.
pub(crate) fn write_document(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).map_err(|e| DuskError::file(path, e))
}

// ── EOL mode ──────────────────────────────────────────────────────────────────

/// The end-of-line convention that dominates the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EolMode {
    /// Windows-style `\r\n`.
    Crlf,
    /// Unix-style `\n`.
    Lf,
    /// Old Mac-style `\r`.
    Cr,
}

impl EolMode {
    /// Short display string shown in the status bar.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Crlf => "CRLF",
            Self::Lf => "LF",
            Self::Cr => "CR",
        }
    }

    /// Detect the dominant EOL style in `text`.
    ///
    /// Counts `\r\n`, `\r` and `\n` and returns whichever appears most.
    /// Falls back to `Crlf` when no line endings are present.
    pub(crate) fn detect(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut crlf = 0usize;
        let mut lf = 0usize;
        let mut cr = 0usize;
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    crlf += 1;
                    i += 2;
                }
                b'\r' => {
                    cr += 1;
                    i += 1;
                }
                b'\n' => {
                    lf += 1;
                    i += 1;
                }
                _ => i += 1,
            }
        }
        if crlf >= lf && crlf >= cr {
            Self::Crlf
        } else if lf >= cr {
            Self::Lf
        } else {
            Self::Cr
        }
    }
}

// ── DocumentState ─────────────────────────────────────────────────────────────

/// File-level state of the open document.
#[derive(Debug)]
pub(crate) struct DocumentState {
    /// Path on disk, or `None` for an untitled buffer.
    pub(crate) path: Option<PathBuf>,
    /// The EOL convention detected when the file was opened.
    pub(crate) eol: EolMode,
    /// `true` when the buffer contains changes not yet saved to disk.
    pub(crate) dirty: bool,
}

impl DocumentState {
    fn new_untitled() -> Self {
        Self {
            path: None,
            eol: EolMode::Crlf,
            dirty: false,
        }
    }

    /// The bare filename component, or `"Untitled"` if no path is set.
    pub(crate) fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_owned())
    }
}

// ── Replace step ──────────────────────────────────────────────────────────────

/// Result of one Replace click: whether the selection was replaced, and the
/// next match that is now selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReplaceStep {
    pub(crate) replaced: bool,
    pub(crate) next: Option<MatchRange>,
}

// ── App ───────────────────────────────────────────────────────────────────────

/// The editing session: one document, its buffer, and the user preferences.
pub(crate) struct App {
    pub(crate) doc: DocumentState,
    pub(crate) buffer: TextBuffer,
    prefs: Preferences,
    store: SettingsStore,
    last_search: Option<SearchOptions>,
}

impl App {
    /// Create a session with an untitled, empty document and preferences
    /// loaded from `store`.
    pub(crate) fn new(store: SettingsStore) -> Self {
        let prefs = store.load();
        let app = Self {
            doc: DocumentState::new_untitled(),
            buffer: TextBuffer::new(),
            prefs,
            store,
            last_search: None,
        };
        // Write back at once so a missing or partly malformed file is
        // replaced by a complete one.
        app.persist_prefs();
        app
    }

    pub(crate) fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub(crate) fn last_search(&self) -> Option<&SearchOptions> {
        self.last_search.as_ref()
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No path, clean | `"Dusk"` |
    /// | Path set, clean | `"filename — Dusk"` |
    /// | Path set, dirty | `"*filename — Dusk"` |
    /// | No path, dirty | `"*Untitled — Dusk"` |
    pub(crate) fn window_title(&self) -> String {
        if self.doc.path.is_none() && !self.doc.dirty {
            return APP_NAME.to_owned();
        }
        let dirty = if self.doc.dirty { "*" } else { "" };
        format!("{dirty}{} \u{2014} {APP_NAME}", self.doc.display_name())
    }

    /// Record that the host edited the buffer.
    pub(crate) fn mark_dirty(&mut self) {
        self.doc.dirty = true;
    }

    // ── Document lifecycle ────────────────────────────────────────────────────

    /// Discard the current document and start an untitled one.
    pub(crate) fn new_document(&mut self) {
        self.doc = DocumentState::new_untitled();
        self.buffer = TextBuffer::new();
    }

    /// Load `path` into the buffer and record it as a recent file.
    ///
    /// On failure the current document is left untouched.
    pub(crate) fn open(&mut self, path: PathBuf) -> Result<()> {
        let text = read_document(&path)?;
        log::info!("opened {} ({} bytes)", path.display(), text.len());

        self.doc.eol = EolMode::detect(&text);
        self.doc.dirty = false;
        self.buffer = TextBuffer::from_text(text);
        self.add_recent_file(&path);
        self.doc.path = Some(path);
        Ok(())
    }

    /// Write the buffer to `path` and make it the document's path.
    ///
    /// Serves both Save (same path) and Save As (new path; recorded as a
    /// recent file).
    pub(crate) fn save_to(&mut self, path: PathBuf) -> Result<()> {
        write_document(&path, self.buffer.text())?;
        log::info!("saved {}", path.display());

        if self.doc.path.as_deref() != Some(path.as_path()) {
            self.add_recent_file(&path);
        }
        self.doc.path = Some(path);
        self.doc.dirty = false;
        Ok(())
    }

    // ── Search & replace ──────────────────────────────────────────────────────

    /// Search for `query` from the caret and select the match.
    ///
    /// The query is remembered for `repeat_search`.  An empty query is a
    /// no-op and is not remembered.
    pub(crate) fn find(&mut self, query: &str, forward: bool) -> Option<MatchRange> {
        if query.is_empty() {
            return None;
        }
        self.last_search = Some(SearchOptions {
            text: query.to_owned(),
            forward,
        });
        self.repeat_search(forward)
    }

    /// Repeat the last search in the given direction.
    ///
    /// Returns `None` when nothing matches or no search has been made.
    pub(crate) fn repeat_search(&mut self, forward: bool) -> Option<MatchRange> {
        let opts = self.last_search.as_mut()?;
        opts.forward = forward;
        let from = if forward {
            self.buffer.search_anchor()
        } else {
            self.buffer.selection().map_or(self.buffer.cursor(), |s| s.start)
        };
        let found = opts.run(self.buffer.text(), from)?;
        self.buffer.set_selection(found.start, found.end);
        Some(found)
    }

    /// One Replace click.
    ///
    /// If the selection is exactly `query` it is replaced; either way the next
    /// match after the caret is then selected.
    pub(crate) fn replace(&mut self, query: &str, replacement: &str) -> ReplaceStep {
        let mut replaced = false;
        if !query.is_empty() && self.buffer.selected_text() == Some(query) {
            let selection = self.buffer.selection();
            if let (Some(sel), Some(text)) = (
                selection,
                replace_one(self.buffer.text(), selection, replacement),
            ) {
                self.buffer
                    .apply_edit(text, sel.start + replacement.chars().count());
                self.doc.dirty = true;
                replaced = true;
            }
        }
        let next = self.find(query, true);
        ReplaceStep { replaced, next }
    }

    /// Replace every occurrence of `query`; returns how many were replaced.
    pub(crate) fn replace_all(&mut self, query: &str, replacement: &str) -> usize {
        let (text, count) = replace_all(self.buffer.text(), query, replacement);
        if count > 0 {
            let cursor = self.buffer.cursor();
            self.buffer.apply_edit(text, cursor);
            self.doc.dirty = true;
        }
        count
    }

    pub(crate) fn go_to_line(&mut self, line: usize) -> Result<()> {
        self.buffer.go_to_line(line)
    }

    // ── Preferences ───────────────────────────────────────────────────────────

    /// Apply `change` to the preferences and save them if it reports a change.
    pub(crate) fn update_prefs(&mut self, change: impl FnOnce(&mut Preferences) -> bool) -> bool {
        let changed = change(&mut self.prefs);
        if changed {
            self.persist_prefs();
        }
        changed
    }

    /// Record `path` at the front of the recent-files list and save.
    pub(crate) fn add_recent_file(&mut self, path: &Path) {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let path = path.to_string_lossy();
        self.update_prefs(|p| {
            p.add_recent_file(&path);
            true
        });
    }

    /// Save preferences, logging and discarding any error.
    pub(crate) fn persist_prefs(&self) {
        if let Err(e) = self.store.save(&self.prefs) {
            log::warn!("could not save preferences: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
