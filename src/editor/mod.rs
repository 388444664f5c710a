// ── Editor component abstraction ──────────────────────────────────────────────
//
// The document model the rest of the crate edits.  Hosts render it however
// they like; nothing here knows about windows, fonts or themes.

pub(crate) mod buffer;

pub(crate) use buffer::{Selection, TextBuffer};
