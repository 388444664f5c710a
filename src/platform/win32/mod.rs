// ── Win32 error notice ────────────────────────────────────────────────────────
//
// One `MessageBoxW` call for fatal errors; the only `unsafe` in the crate.

#![allow(unsafe_code)]

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::HWND,
        UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK},
    },
};

use crate::app::APP_NAME;

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Block on an ownerless error message box until the user dismisses it.
pub(crate) fn show_error_dialog(message: &str) {
    let text = to_wide(message);
    let caption = to_wide(&format!("{APP_NAME}: error"));

    // SAFETY: both buffers are NUL-terminated and outlive the call. A null
    // HWND gives the box no owner.
    unsafe {
        let _ = MessageBoxW(
            HWND::default(),
            PCWSTR(text.as_ptr()),
            PCWSTR(caption.as_ptr()),
            MB_OK | MB_ICONERROR,
        );
    }
}
