// ── Console host ──────────────────────────────────────────────────────────────
//
// A line-oriented front end over `commands::dispatch`.  Each input line names
// one menu command (`find cat`, `replaceall /cat/dog/`, `zoom in`, ...).  The
// console stands in for the host text widget: Cut/Copy/Paste use an
// in-process clipboard, and Undo/Redo are reported as unavailable.

use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use crate::{
    app::App,
    commands::{dispatch, Command, HostAction, NoticeKind, Outcome},
    error::Result,
    ui::status::status_text,
};

const PROMPT: &str = "dusk> ";

const HELP: &str = "\
File:    new[!]  open[!] <path>  save  saveas <path>  exit[!]
Edit:    undo  redo  cut  copy  paste  selectall  type <text>
Search:  find <text>  next  prev  replace /find/with/  replaceall /find/with/
         goto <line>
View:    zoom in|out|reset  wrap  statusbar  font <size> <family>
         geometry <WxH+X+Y>
Info:    print  status  recent  help
A trailing '!' discards unsaved changes without asking.";

// ── Parsing ───────────────────────────────────────────────────────────────────

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Command(Command),
    /// Insert text at the caret (`\n` and `\t` escapes are expanded).
    Type(String),
    Print,
    Status,
    Recent,
    Help,
    Empty,
    Unknown(String),
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Split `/find/with/` on its first character.  The trailing delimiter is
/// optional; the replacement may be empty.
fn parse_pair(rest: &str) -> Option<(String, String)> {
    let rest = rest.trim_start();
    let delim = rest.chars().next()?;
    let mut parts = rest[delim.len_utf8()..].splitn(3, delim);
    let query = parts.next()?;
    let replacement = parts.next()?;
    Some((query.to_owned(), replacement.to_owned()))
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

fn parse(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let (word, force) = match word.strip_suffix('!') {
        Some(w) => (w, true),
        None => (word, false),
    };

    let command = match word {
        "" => return Input::Empty,
        "new" => Command::New { force },
        "open" => Command::Open {
            path: non_empty(rest).map(PathBuf::from),
            force,
        },
        "save" => Command::Save,
        "saveas" => Command::SaveAs(non_empty(rest).map(PathBuf::from)),
        "undo" => Command::Undo,
        "redo" => Command::Redo,
        "cut" => Command::Cut,
        "copy" => Command::Copy,
        "paste" => Command::Paste,
        "selectall" => Command::SelectAll,
        "find" => Command::Find(rest.to_owned()),
        "next" => Command::FindNext,
        "prev" => Command::FindPrevious,
        "replace" | "replaceall" => {
            let Some((query, replacement)) = parse_pair(rest) else {
                return Input::Unknown(line.to_owned());
            };
            if word == "replace" {
                Command::Replace { query, replacement }
            } else {
                Command::ReplaceAll { query, replacement }
            }
        }
        "goto" => match non_empty(rest).map(str::parse::<usize>) {
            None => Command::GoToLine(None),
            Some(Ok(n)) => Command::GoToLine(Some(n)),
            Some(Err(_)) => return Input::Unknown(line.to_owned()),
        },
        "zoom" => match rest.trim() {
            "in" => Command::ZoomIn,
            "out" => Command::ZoomOut,
            "reset" => Command::ZoomReset,
            _ => return Input::Unknown(line.to_owned()),
        },
        "wrap" => Command::ToggleWordWrap,
        "statusbar" => Command::ToggleStatusBar,
        "font" => {
            let (size, family) = rest.trim().split_once(' ').unwrap_or((rest.trim(), ""));
            match size.parse() {
                Ok(size) => Command::SetFont {
                    family: family.trim().to_owned(),
                    size,
                },
                Err(_) => return Input::Unknown(line.to_owned()),
            }
        }
        "geometry" => match non_empty(rest) {
            Some(g) => Command::SetWindowGeometry(g.to_owned()),
            None => return Input::Unknown(line.to_owned()),
        },
        "exit" | "quit" => Command::Exit { force },
        "type" => return Input::Type(unescape(rest)),
        "print" => return Input::Print,
        "status" => return Input::Status,
        "recent" => return Input::Recent,
        "help" => return Input::Help,
        _ => return Input::Unknown(line.to_owned()),
    };
    Input::Command(command)
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// Drives an `App` from a line reader and renders outcomes to a writer.
pub(crate) struct ConsoleHost<R, W> {
    app: App,
    clipboard: String,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> ConsoleHost<R, W> {
    pub(crate) fn new(app: App, input: R, out: W) -> Self {
        Self {
            app,
            clipboard: String::new(),
            input,
            out,
        }
    }

    /// Read and execute lines until `exit` or end of input.
    ///
    /// End of input exits without asking about unsaved changes.  Only
    /// console I/O errors are returned.
    pub(crate) fn run(&mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            write!(self.out, "{PROMPT}")?;
            self.out.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.out)?;
                self.execute(Command::Exit { force: true })?;
                return Ok(());
            }
            if self.handle_line(&line)? {
                return Ok(());
            }
        }
    }

    /// Returns `true` when the session should end.
    fn handle_line(&mut self, line: &str) -> Result<bool> {
        match parse(line) {
            Input::Command(command) => return self.execute(command),
            Input::Type(text) => {
                self.app.buffer.insert(&text);
                self.app.mark_dirty();
            }
            Input::Print => {
                let text = self.app.buffer.text();
                write!(self.out, "{text}")?;
                if !text.ends_with('\n') {
                    writeln!(self.out)?;
                }
            }
            Input::Status => {
                writeln!(self.out, "{}", self.app.window_title())?;
                writeln!(self.out, "{}", status_text(&self.app))?;
            }
            Input::Recent => {
                let prefs = self.app.prefs();
                if prefs.recent_files.is_empty() {
                    writeln!(self.out, "(no recent files)")?;
                }
                for (i, path) in prefs.recent_files.iter().enumerate() {
                    writeln!(self.out, "{:>2}. {path}", i + 1)?;
                }
            }
            Input::Help => writeln!(self.out, "{HELP}")?,
            Input::Empty => {}
            Input::Unknown(text) => {
                writeln!(self.out, "unrecognised command: {text:?} (try 'help')")?;
            }
        }
        Ok(false)
    }

    /// Dispatch one command and render its outcome.
    ///
    /// Returns `true` when the session should end.
    pub(crate) fn execute(&mut self, command: Command) -> Result<bool> {
        match dispatch(&mut self.app, command) {
            Outcome::Nothing => {}
            Outcome::Updated => {
                if self.app.prefs().show_status_bar {
                    writeln!(self.out, "{}", status_text(&self.app))?;
                }
            }
            Outcome::Notice(notice) => match notice.kind {
                NoticeKind::Info => writeln!(self.out, "{}", notice.message)?,
                NoticeKind::Error => writeln!(self.out, "error: {}", notice.message)?,
            },
            Outcome::Host(action) => self.host_action(action)?,
            Outcome::PromptSaveAs => {
                writeln!(self.out, "No file name yet; use 'saveas <path>'.")?;
            }
            Outcome::ConfirmDiscard => {
                writeln!(
                    self.out,
                    "{} has unsaved changes; save first or repeat the command with '!' to discard them.",
                    self.app.doc.display_name()
                )?;
            }
            Outcome::Exit => return Ok(true),
        }
        Ok(false)
    }

    fn host_action(&mut self, action: HostAction) -> Result<()> {
        match action {
            HostAction::Cut => {
                if let Some(text) = self.app.buffer.delete_selection() {
                    self.clipboard = text;
                    self.app.mark_dirty();
                }
            }
            HostAction::Copy => {
                if let Some(text) = self.app.buffer.selected_text() {
                    self.clipboard = text.to_owned();
                }
            }
            HostAction::Paste => {
                if !self.clipboard.is_empty() {
                    self.app.buffer.insert(&self.clipboard);
                    self.app.mark_dirty();
                }
            }
            HostAction::Undo | HostAction::Redo => {
                writeln!(self.out, "{action:?} is not available in the console.")?;
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SettingsStore;

    fn run_script(dir: &tempfile::TempDir, script: &str) -> String {
        let app = App::new(SettingsStore::new(Some(dir.path().join("settings.json"))));
        let mut out = Vec::new();
        ConsoleHost::new(app, script.as_bytes(), &mut out)
            .run()
            .expect("console I/O");
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn parses_commands() {
        assert_eq!(parse("new!\n"), Input::Command(Command::New { force: true }));
        assert_eq!(
            parse("open /tmp/a b.txt"),
            Input::Command(Command::Open {
                path: Some(PathBuf::from("/tmp/a b.txt")),
                force: false
            })
        );
        assert_eq!(
            parse("open"),
            Input::Command(Command::Open {
                path: None,
                force: false
            })
        );
        assert_eq!(
            parse("find two words"),
            Input::Command(Command::Find("two words".to_owned()))
        );
        assert_eq!(parse("goto 12"), Input::Command(Command::GoToLine(Some(12))));
        assert_eq!(parse("goto"), Input::Command(Command::GoToLine(None)));
        assert!(matches!(parse("goto x"), Input::Unknown(_)));
        assert_eq!(parse("zoom out"), Input::Command(Command::ZoomOut));
        assert_eq!(
            parse("font 14 Cascadia Mono"),
            Input::Command(Command::SetFont {
                family: "Cascadia Mono".to_owned(),
                size: 14
            })
        );
        assert_eq!(parse("type a\\nb"), Input::Type("a\nb".to_owned()));
        assert_eq!(parse("   "), Input::Empty);
        assert!(matches!(parse("frobnicate"), Input::Unknown(_)));
    }

    #[test]
    fn parses_replace_pairs() {
        assert_eq!(
            parse("replaceall /at/AT/"),
            Input::Command(Command::ReplaceAll {
                query: "at".to_owned(),
                replacement: "AT".to_owned()
            })
        );
        assert_eq!(
            parse("replace |a/b|"),
            Input::Command(Command::Replace {
                query: "a/b".to_owned(),
                replacement: String::new()
            })
        );
        assert!(matches!(parse("replace /only"), Input::Unknown(_)));
        assert!(matches!(parse("replaceall"), Input::Unknown(_)));
    }

    #[test]
    fn edit_and_save_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out.txt");
        let script = format!(
            "type the cat sat on the mat\nreplaceall /at/AT/\nsave\nsaveas {}\nprint\nexit\n",
            path.display()
        );
        let out = run_script(&dir, &script);
        assert!(out.contains("Replaced 3 occurrences."), "{out}");
        assert!(out.contains("No file name yet"), "{out}");
        assert!(out.contains("the cAT sAT on the mAT"), "{out}");
        assert_eq!(
            std::fs::read_to_string(&path).expect("saved file"),
            "the cAT sAT on the mAT"
        );
    }

    #[test]
    fn exit_with_unsaved_changes_asks_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run_script(&dir, "type draft\nexit\nexit!\nprint\n");
        assert!(out.contains("Untitled has unsaved changes"), "{out}");
        // `print` after `exit!` is never reached.
        assert!(!out.contains("draft\n"), "{out}");
    }

    #[test]
    fn clipboard_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run_script(
            &dir,
            "type hello world\nfind world\ncut\nfind hello\ncopy\npaste\npaste\nprint\n",
        );
        // Cut removes "world"; the caret then sits after the pasted "hello".
        assert!(out.contains("hellohello \n"), "{out}");
    }

    #[test]
    fn undo_is_reported_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run_script(&dir, "undo\n");
        assert!(out.contains("Undo is not available"), "{out}");
    }

    #[test]
    fn missing_file_reports_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let script = format!("open {}\n", dir.path().join("nope.txt").display());
        let out = run_script(&dir, &script);
        assert!(out.contains("error: Could not open file:"), "{out}");
    }

    #[test]
    fn end_of_input_flushes_preferences() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = run_script(&dir, "zoom in\nwrap\n");
        assert!(out.contains("109%"), "{out}");
        let prefs = SettingsStore::new(Some(dir.path().join("settings.json"))).load();
        assert_eq!(prefs.font_size, 12);
        assert!(!prefs.word_wrap);
    }
}
