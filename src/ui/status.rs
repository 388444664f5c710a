// ── Status bar text ───────────────────────────────────────────────────────────
//
// Pure Rust formatting of the status-bar content.  Hosts decide whether to
// show it (`Preferences::show_status_bar`).

use crate::app::App;

/// Compute the status-bar text for the current session.
///
/// Format: `"Ln 3, Col 14  |  110%  |  CRLF  |  UTF-8"`.  When text is
/// selected the selection length is appended to the position.
pub(crate) fn status_text(app: &App) -> String {
    let pos = app.buffer.position();
    let selected = app
        .buffer
        .selection()
        .map(|s| format!(" ({} selected)", s.end - s.start))
        .unwrap_or_default();
    format!(
        "Ln {}, Col {}{selected}  |  {}%  |  {}  |  UTF-8",
        pos.line,
        pos.column,
        app.prefs().zoom_percent(),
        app.doc.eol.as_str(),
    )
}
