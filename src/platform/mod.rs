// ── Platform abstraction layer ────────────────────────────────────────────────
//
// The few things the binary needs from the OS beyond files: a blocking error
// notice and a log sink.  All Win32 FFI is confined to the `win32` sub-module
// and never leaks outward; other targets report on stderr.

pub(crate) mod logger;

#[cfg(windows)]
pub(crate) mod win32;

/// Show a blocking error notice.
///
/// A modal message box on Windows; a line on stderr elsewhere.
pub(crate) fn show_error_dialog(message: &str) {
    #[cfg(windows)]
    win32::show_error_dialog(message);

    #[cfg(not(windows))]
    eprintln!("{}: {message}", crate::app::APP_NAME);
}
