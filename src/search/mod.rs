// ── Search engine ─────────────────────────────────────────────────────────────
//
// Pure functions over `(document, query, offset)`.  Matching is exact and
// case-sensitive; offsets are character offsets.  No editor state is touched
// here; the caller moves the selection to whatever range comes back.

pub(crate) mod replace;

use crate::editor::buffer::{byte_offset, char_offset};

/// A half-open `[start, end)` character range identifying one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MatchRange {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Parameters of the last search, kept so that Find Next / Find Previous can
/// repeat it without asking for the query again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchOptions {
    pub(crate) text: String,
    pub(crate) forward: bool,
}

impl SearchOptions {
    pub(crate) fn run(&self, document: &str, from: usize) -> Option<MatchRange> {
        if self.forward {
            find_next(document, &self.text, from)
        } else {
            find_prev(document, &self.text, from)
        }
    }
}

/// Convert a byte-offset match in `document` to a character range.
fn to_range(document: &str, byte_start: usize, query: &str) -> MatchRange {
    let start = char_offset(document, byte_start);
    MatchRange {
        start,
        end: start + query.chars().count(),
    }
}

/// Find the first occurrence of `query` at or after `from`, wrapping around.
///
/// The forward scan covers `[from, len)`.  If it fails, the wrap scan accepts
/// the first match that *starts* before `from`.  An empty query never matches.
/// `from` past the end of the document is clamped.
pub(crate) fn find_next(document: &str, query: &str, from: usize) -> Option<MatchRange> {
    if query.is_empty() {
        return None;
    }
    let from_byte = byte_offset(document, from);

    // Primary: from the anchor to the end of the document.
    if let Some(pos) = document[from_byte..].find(query) {
        return Some(to_range(document, from_byte + pos, query));
    }

    // Wrap: from the start, only matches beginning before the anchor.
    document
        .match_indices(query)
        .map(|(pos, _)| pos)
        .take_while(|&pos| pos < from_byte)
        .next()
        .map(|pos| to_range(document, pos, query))
}

/// Find the last occurrence of `query` that ends at or before `before`,
/// wrapping around to the end of the document.
///
/// `before` is normally the start of the current selection, so repeated
/// calls walk backwards through the matches.
pub(crate) fn find_prev(document: &str, query: &str, before: usize) -> Option<MatchRange> {
    if query.is_empty() {
        return None;
    }
    let before_byte = byte_offset(document, before);

    // Primary: from the anchor back to the start of the document.
    if let Some(pos) = document[..before_byte].rfind(query) {
        return Some(to_range(document, pos, query));
    }

    // Wrap: from the end, only matches that end after the anchor.
    document
        .rmatch_indices(query)
        .map(|(pos, _)| pos)
        .take_while(|&pos| pos + query.len() > before_byte)
        .next()
        .map(|pos| to_range(document, pos, query))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
