// ── Safety policy ────────────────────────────────────────────────────────────
// Unsafe code is forbidden everywhere except `platform::win32` (Win32 FFI for
// the error message box).  Each unsafe block there MUST carry a `// SAFETY:`
// comment.
#![deny(unsafe_code)]

mod app;
mod commands;
mod editor;
mod error;
mod platform;
mod search;
mod settings;
mod ui;

use std::path::PathBuf;

use clap::Parser;

use crate::{
    app::App,
    commands::Command,
    error::Result,
    settings::SettingsStore,
    ui::console::ConsoleHost,
};

/// A small dark Notepad: find/replace, zoom, and remembered preferences.
#[derive(Debug, Parser)]
#[command(name = "dusk", version, about)]
struct Cli {
    /// File to open on startup.
    file: Option<PathBuf>,

    /// Settings file to use instead of the per-user default.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Increase log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    platform::logger::init(cli.verbose);

    if let Err(e) = run(cli) {
        // Only console I/O failures reach here; document and settings errors
        // are handled inside the session.
        platform::show_error_dialog(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = SettingsStore::new(cli.settings);
    match store.path() {
        Some(path) => log::info!("settings file: {}", path.display()),
        None => log::warn!("no settings directory; preferences will not be saved"),
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut host = ConsoleHost::new(App::new(store), stdin.lock(), stdout.lock());

    if let Some(path) = cli.file {
        host.execute(Command::Open {
            path: Some(path),
            force: false,
        })?;
    }
    host.run()
}
