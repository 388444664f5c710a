// ── Presentation helpers ──────────────────────────────────────────────────────
//
// Host-side glue: status-bar text and the console front end.  The core
// (`app`, `commands`, `search`, `settings`) never calls into this module.

pub(crate) mod console;
pub(crate) mod status;
