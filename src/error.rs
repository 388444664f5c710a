// ── Central error type ────────────────────────────────────────────────────────
//
// All fallible operations in Dusk return `error::Result<T>`.  Document I/O
// errors surface as blocking notices; settings errors are logged and dropped
// by the caller (see `App::persist_prefs`).

use std::path::PathBuf;

use thiserror::Error;

/// Every error that Dusk can produce.
#[derive(Debug, Error)]
pub(crate) enum DuskError {
    /// A standard I/O error with no document path attached.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing a document failed.
    #[error("could not access {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings record could not be encoded or parsed.
    #[error("settings serialization failed: {0}")]
    Settings(#[from] serde_json::Error),

    /// No configuration directory could be resolved from the environment.
    #[error("no settings directory (APPDATA, XDG_CONFIG_HOME and HOME are unset)")]
    NoSettingsDir,

    /// Go To Line was given a line past the end of the document.
    #[error("line {line} is beyond the total number of lines ({total})")]
    LineOutOfRange { line: usize, total: usize },
}

impl DuskError {
    /// Attach a document path to an I/O error.
    pub(crate) fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the crate.
pub(crate) type Result<T> = std::result::Result<T, DuskError>;
