// ── Text buffer ───────────────────────────────────────────────────────────────
//
// The in-memory document plus caret and selection.  All positions exposed by
// this module are *character* offsets (Unicode scalar values), never byte
// offsets; conversion to byte indices happens only at the `str` boundary.

use crate::error::{DuskError, Result};

// ── Offset conversion ─────────────────────────────────────────────────────────

/// Byte index of the character at `chars` in `text`, clamped to `text.len()`.
pub(crate) fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Character offset of the byte index `bytes` (which must be a char boundary).
pub(crate) fn char_offset(text: &str, bytes: usize) -> usize {
    text[..bytes].chars().count()
}

// ── Positions ─────────────────────────────────────────────────────────────────

/// A 1-based (line, column) pair as shown in the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CursorPosition {
    pub(crate) line: usize,
    pub(crate) column: usize,
}

/// A half-open `[start, end)` range of character offsets with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Selection {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl Selection {
    /// Build a selection from two offsets in either order.
    pub(crate) fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub(crate) fn is_empty(self) -> bool {
        self.start == self.end
    }
}

// ── TextBuffer ────────────────────────────────────────────────────────────────

/// Document content with a caret and an optional selection.
///
/// Invariant: `cursor` and both selection ends are `<= char_len()`.
#[derive(Debug, Default)]
pub(crate) struct TextBuffer {
    text: String,
    char_len: usize,
    cursor: usize,
    selection: Option<Selection>,
}

impl TextBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_text(text: String) -> Self {
        let mut buf = Self::new();
        buf.set_text(text);
        buf
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    /// Length of the document in characters.
    #[cfg(test)]
    pub(crate) fn char_len(&self) -> usize {
        self.char_len
    }

    /// Replace the whole document; the caret moves to the start.
    pub(crate) fn set_text(&mut self, text: String) {
        self.apply_edit(text, 0);
    }

    /// Replace the whole document after an edit computed elsewhere and place
    /// the caret at `cursor` (clamped).  Clears the selection.
    pub(crate) fn apply_edit(&mut self, text: String, cursor: usize) {
        self.char_len = text.chars().count();
        self.text = text;
        self.cursor = cursor.min(self.char_len);
        self.selection = None;
    }

    // ── Caret & selection ─────────────────────────────────────────────────────

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the caret, clearing any selection.
    pub(crate) fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.char_len);
        self.selection = None;
    }

    pub(crate) fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Select `[start, end)`; the caret sits at the end of the selection.
    /// An empty range just moves the caret.
    pub(crate) fn set_selection(&mut self, start: usize, end: usize) {
        let sel = Selection::new(start.min(self.char_len), end.min(self.char_len));
        self.cursor = sel.end;
        self.selection = (!sel.is_empty()).then_some(sel);
    }

    pub(crate) fn select_all(&mut self) {
        self.set_selection(0, self.char_len);
    }

    /// The selected text, or `None` when nothing is selected.
    pub(crate) fn selected_text(&self) -> Option<&str> {
        let sel = self.selection?;
        let start = byte_offset(&self.text, sel.start);
        let end = byte_offset(&self.text, sel.end);
        Some(&self.text[start..end])
    }

    /// Offset a forward search should start from: the end of the selection
    /// if there is one, otherwise the caret.
    pub(crate) fn search_anchor(&self) -> usize {
        self.selection.map_or(self.cursor, |s| s.end)
    }

    // ── Editing ───────────────────────────────────────────────────────────────

    /// Insert `s` at the caret, replacing the selection if any.
    pub(crate) fn insert(&mut self, s: &str) {
        if self.selection.is_some() {
            self.delete_selection();
        }
        let at = byte_offset(&self.text, self.cursor);
        self.text.insert_str(at, s);
        let added = s.chars().count();
        self.char_len += added;
        self.cursor += added;
    }

    /// Remove the selected text and return it.  The caret moves to where the
    /// selection started.
    pub(crate) fn delete_selection(&mut self) -> Option<String> {
        let sel = self.selection.take()?;
        let start = byte_offset(&self.text, sel.start);
        let end = byte_offset(&self.text, sel.end);
        let removed: String = self.text.drain(start..end).collect();
        self.char_len -= sel.end - sel.start;
        self.cursor = sel.start;
        Some(removed)
    }

    // ── Lines ─────────────────────────────────────────────────────────────────

    /// Start offset and length (in characters, excluding the break) of every
    /// line.  `\r\n`, `\r` and `\n` each end one line.
    fn line_spans(&self) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;
        let mut offset = 0;
        let mut chars = self.text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' | '\n' => {
                    spans.push((start, offset - start));
                    offset += 1;
                    if c == '\r' && chars.peek() == Some(&'\n') {
                        chars.next();
                        offset += 1;
                    }
                    start = offset;
                }
                _ => offset += 1,
            }
        }
        spans.push((start, offset - start));
        spans
    }

    /// Number of lines; an empty document has one line.
    pub(crate) fn line_count(&self) -> usize {
        self.line_spans().len()
    }

    /// Convert a character offset to a 1-based line/column pair.
    ///
    /// An offset inside a line break reports the column just past the end
    /// of that line.
    pub(crate) fn offset_to_position(&self, offset: usize) -> CursorPosition {
        let offset = offset.min(self.char_len);
        let spans = self.line_spans();
        let index = spans
            .iter()
            .rposition(|&(start, _)| start <= offset)
            .unwrap_or(0);
        let (start, len) = spans[index];
        CursorPosition {
            line: index + 1,
            column: (offset - start).min(len) + 1,
        }
    }

    /// Convert a line/column pair back to a character offset.
    ///
    /// Returns `None` if the line does not exist or the column lies past the
    /// end of that line.
    pub(crate) fn position_to_offset(&self, pos: CursorPosition) -> Option<usize> {
        if pos.column == 0 {
            return None;
        }
        let &(start, len) = self.line_spans().get(pos.line.checked_sub(1)?)?;
        (pos.column <= len + 1).then_some(start + pos.column - 1)
    }

    /// Caret position as a line/column pair.
    pub(crate) fn position(&self) -> CursorPosition {
        self.offset_to_position(self.cursor)
    }

    /// Move the caret to column 1 of `line`.  Line 0 is treated as line 1.
    pub(crate) fn go_to_line(&mut self, line: usize) -> Result<()> {
        let line = line.max(1);
        let total = self.line_count();
        if line > total {
            return Err(DuskError::LineOutOfRange { line, total });
        }
        let offset = self
            .position_to_offset(CursorPosition { line, column: 1 })
            .unwrap_or(self.char_len);
        self.set_cursor(offset);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_has_one_line() {
        let buf = TextBuffer::new();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.position(), CursorPosition { line: 1, column: 1 });
    }

    #[test]
    fn offsets_are_characters_not_bytes() {
        let buf = TextBuffer::from_text("héllo wörld".to_owned());
        assert_eq!(buf.char_len(), 11);
        assert_eq!(byte_offset(buf.text(), 2), 3);
        assert_eq!(char_offset(buf.text(), 3), 2);
        assert_eq!(byte_offset(buf.text(), 99), buf.text().len());
    }

    #[test]
    fn position_round_trip() {
        let buf = TextBuffer::from_text("ab\ncde\n\nf".to_owned());
        let pos = buf.offset_to_position(5);
        assert_eq!(pos, CursorPosition { line: 2, column: 3 });
        assert_eq!(buf.position_to_offset(pos), Some(5));
        assert_eq!(
            buf.position_to_offset(CursorPosition { line: 3, column: 1 }),
            Some(7)
        );
        // Column one past the end of the line is the newline position.
        assert_eq!(
            buf.position_to_offset(CursorPosition { line: 1, column: 3 }),
            Some(2)
        );
        assert_eq!(
            buf.position_to_offset(CursorPosition { line: 1, column: 4 }),
            None
        );
        assert_eq!(
            buf.position_to_offset(CursorPosition { line: 5, column: 1 }),
            None
        );
    }

    #[test]
    fn selection_is_normalised_and_clamped() {
        let mut buf = TextBuffer::from_text("hello".to_owned());
        buf.set_selection(4, 1);
        assert_eq!(buf.selection(), Some(Selection { start: 1, end: 4 }));
        assert_eq!(buf.selected_text(), Some("ell"));
        assert_eq!(buf.cursor(), 4);

        buf.set_selection(2, 50);
        assert_eq!(buf.selection(), Some(Selection { start: 2, end: 5 }));

        buf.set_selection(3, 3);
        assert_eq!(buf.selection(), None);
        assert_eq!(buf.cursor(), 3);
    }

    #[test]
    fn insert_replaces_selection() {
        let mut buf = TextBuffer::from_text("the cat".to_owned());
        buf.set_selection(4, 7);
        buf.insert("dog");
        assert_eq!(buf.text(), "the dog");
        assert_eq!(buf.cursor(), 7);
        assert_eq!(buf.selection(), None);
    }

    #[test]
    fn delete_selection_returns_removed_text() {
        let mut buf = TextBuffer::from_text("naïve text".to_owned());
        buf.set_selection(0, 6);
        assert_eq!(buf.delete_selection().as_deref(), Some("naïve "));
        assert_eq!(buf.text(), "text");
        assert_eq!(buf.char_len(), 4);
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.delete_selection(), None);
    }

    #[test]
    fn select_all_covers_document() {
        let mut buf = TextBuffer::from_text("abc\ndef".to_owned());
        buf.select_all();
        assert_eq!(buf.selected_text(), Some("abc\ndef"));
        assert_eq!(buf.search_anchor(), 7);
    }

    #[test]
    fn cr_only_text_has_one_line_per_break() {
        let mut buf = TextBuffer::from_text("one\rtwo\rthree".to_owned());
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.offset_to_position(4), CursorPosition { line: 2, column: 1 });
        assert_eq!(buf.offset_to_position(10), CursorPosition { line: 3, column: 3 });
        buf.go_to_line(2).expect("line 2 exists");
        assert_eq!(buf.cursor(), 4);
        buf.go_to_line(3).expect("line 3 exists");
        assert_eq!(buf.cursor(), 8);
    }

    #[test]
    fn crlf_counts_as_a_single_break() {
        let mut buf = TextBuffer::from_text("ab\r\ncd\r\n".to_owned());
        assert_eq!(buf.line_count(), 3);
        // The '\r' is not a column of its own.
        assert_eq!(buf.offset_to_position(2), CursorPosition { line: 1, column: 3 });
        assert_eq!(buf.offset_to_position(3), CursorPosition { line: 1, column: 3 });
        assert_eq!(buf.offset_to_position(5), CursorPosition { line: 2, column: 2 });
        assert_eq!(
            buf.position_to_offset(CursorPosition { line: 1, column: 4 }),
            None
        );
        buf.go_to_line(2).expect("line 2 exists");
        assert_eq!(buf.cursor(), 4);
        buf.go_to_line(3).expect("trailing empty line");
        assert_eq!(buf.cursor(), 8);
    }

    #[test]
    fn go_to_line_moves_caret() {
        let mut buf = TextBuffer::from_text("one\ntwo\nthree".to_owned());
        buf.go_to_line(3).expect("line 3 exists");
        assert_eq!(buf.cursor(), 8);
        buf.go_to_line(0).expect("line 0 clamps to 1");
        assert_eq!(buf.cursor(), 0);
        assert!(matches!(
            buf.go_to_line(4),
            Err(DuskError::LineOutOfRange { line: 4, total: 3 })
        ));
    }
}
