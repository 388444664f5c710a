// ── Replace engine ────────────────────────────────────────────────────────────
//
// Built on the same exact-match rules as `search`.  Zero replacements is a
// normal result, never an error.

use crate::editor::buffer::byte_offset;
use crate::editor::Selection;

/// Replace the selected range of `document` with `replacement`.
///
/// Returns `None` (no-op) when there is no selection or it is empty.
pub(crate) fn replace_one(
    document: &str,
    selection: Option<Selection>,
    replacement: &str,
) -> Option<String> {
    let sel = selection.filter(|s| !s.is_empty())?;
    let start = byte_offset(document, sel.start);
    let end = byte_offset(document, sel.end);

    let mut out = String::with_capacity(document.len() - (end - start) + replacement.len());
    out.push_str(&document[..start]);
    out.push_str(replacement);
    out.push_str(&document[end..]);
    Some(out)
}

/// Replace every non-overlapping occurrence of `query`, left to right.
///
/// Returns the new document and the number of replacements actually made.
/// An empty query leaves the document unchanged and reports zero.
pub(crate) fn replace_all(document: &str, query: &str, replacement: &str) -> (String, usize) {
    if query.is_empty() {
        return (document.to_owned(), 0);
    }

    let mut out = String::with_capacity(document.len());
    let mut count = 0usize;
    let mut last = 0usize;
    for (pos, _) in document.match_indices(query) {
        out.push_str(&document[last..pos]);
        out.push_str(replacement);
        last = pos + query.len();
        count += 1;
    }
    out.push_str(&document[last..]);

    log::debug!("replace_all: {count} occurrence(s) of {query:?}");
    (out, count)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
