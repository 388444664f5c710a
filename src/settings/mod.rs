// ── Settings persistence ──────────────────────────────────────────────────────
//
// Reads and writes `settings.json` in the per-user config directory.
// No `unsafe`, pure safe Rust + serde_json.
//
// Loading never fails: every key is parsed on its own and falls back to its
// default when missing or malformed.  Saving returns an error, but callers
// treat persistence as best-effort (see `App::persist_prefs`).

use std::{
    fs,
    ops::RangeInclusive,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::error::{DuskError, Result};

// ── Limits & defaults ─────────────────────────────────────────────────────────

const SETTINGS_VERSION: u32 = 1;

/// Most-recent-first list length.
pub(crate) const MAX_RECENT_FILES: usize = 10;

pub(crate) const DEFAULT_FONT_FAMILY: &str = "Consolas";
pub(crate) const DEFAULT_FONT_SIZE: u32 = 11;
pub(crate) const FONT_SIZE_RANGE: RangeInclusive<u32> = 6..=72;
const DEFAULT_GEOMETRY: &str = "900x650";

// ── Preferences ───────────────────────────────────────────────────────────────

/// User preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Preferences {
    pub(crate) font_family: String,
    pub(crate) font_size: u32,
    pub(crate) word_wrap: bool,
    pub(crate) show_status_bar: bool,
    /// Absolute paths, most recent first, no duplicates.
    pub(crate) recent_files: Vec<String>,
    /// Host-defined geometry string, e.g. `"900x650+40+40"`.
    pub(crate) window_geometry: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            word_wrap: true,
            show_status_bar: true,
            recent_files: Vec::new(),
            window_geometry: DEFAULT_GEOMETRY.to_owned(),
        }
    }
}

impl Preferences {
    /// Build preferences from a parsed settings record, key by key.
    ///
    /// Anything that is not a JSON object yields the defaults.
    pub(crate) fn from_value(value: &Value) -> Self {
        let mut prefs = Self::default();
        let Value::Object(map) = value else {
            return prefs;
        };

        if let Some(family) = field::<String>(map, "fontFamily").filter(|f| !f.trim().is_empty()) {
            prefs.font_family = family;
        }
        if let Some(size) = field::<u32>(map, "fontSize").filter(|s| FONT_SIZE_RANGE.contains(s)) {
            prefs.font_size = size;
        }
        if let Some(wrap) = field(map, "wordWrap") {
            prefs.word_wrap = wrap;
        }
        if let Some(show) = field(map, "showStatusBar") {
            prefs.show_status_bar = show;
        }
        if let Some(Value::Array(entries)) = map.get("recentFiles") {
            // Non-string entries are dropped rather than discarding the list.
            for path in entries.iter().filter_map(Value::as_str).rev() {
                prefs.add_recent_file(path);
            }
        }
        if let Some(geometry) = field(map, "windowGeometry") {
            prefs.window_geometry = geometry;
        }
        prefs
    }

    /// Move `path` to the front of the recent-files list.
    ///
    /// Any earlier occurrence is removed and the list is cut to
    /// `MAX_RECENT_FILES` entries.
    pub(crate) fn add_recent_file(&mut self, path: &str) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_owned());
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    // ── Zoom ──────────────────────────────────────────────────────────────────

    /// Grow the font by one point.  Returns `false` at the upper limit.
    pub(crate) fn zoom_in(&mut self) -> bool {
        self.set_font_size(self.font_size.saturating_add(1))
    }

    /// Shrink the font by one point.  Returns `false` at the lower limit.
    pub(crate) fn zoom_out(&mut self) -> bool {
        self.set_font_size(self.font_size.saturating_sub(1))
    }

    /// Restore the default font size.  Returns `false` if already there.
    pub(crate) fn zoom_reset(&mut self) -> bool {
        self.set_font_size(DEFAULT_FONT_SIZE)
    }

    /// Zoom level relative to the default size, in percent.
    pub(crate) fn zoom_percent(&self) -> u32 {
        (self.font_size * 100 + DEFAULT_FONT_SIZE / 2) / DEFAULT_FONT_SIZE
    }

    /// Set the font size if it lies in `FONT_SIZE_RANGE` and differs from the
    /// current one.
    pub(crate) fn set_font_size(&mut self, size: u32) -> bool {
        if !FONT_SIZE_RANGE.contains(&size) || size == self.font_size {
            return false;
        }
        self.font_size = size;
        true
    }
}

/// Parse one key of the settings object, or `None` if absent or mistyped.
fn field<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Option<T> {
    serde_json::from_value(map.get(key)?.clone()).ok()
}

// ── On-disk record ────────────────────────────────────────────────────────────

/// Root of the JSON settings file as written.
#[derive(Serialize)]
struct SettingsFile<'a> {
    version: u32,
    #[serde(flatten)]
    prefs: &'a Preferences,
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the default settings path.
///
/// `%APPDATA%\Dusk\settings.json` on Windows, otherwise
/// `$XDG_CONFIG_HOME/dusk/settings.json` or `$HOME/.config/dusk/settings.json`.
pub(crate) fn default_settings_path() -> Option<PathBuf> {
    if let Some(appdata) = std::env::var_os("APPDATA") {
        return Some(PathBuf::from(appdata).join("Dusk").join("settings.json"));
    }
    let config = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config.join("dusk").join("settings.json"))
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// Loads and saves `Preferences` at a fixed path.
#[derive(Debug, Clone)]
pub(crate) struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// A store at `path`, or at `default_settings_path()` when `None`.
    pub(crate) fn new(path: Option<PathBuf>) -> Self {
        Self {
            path: path.or_else(default_settings_path),
        }
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the settings file.
    ///
    /// Returns the defaults on any error: no path, file missing, unreadable,
    /// or not JSON.  The failure is logged at debug level only.
    pub(crate) fn load(&self) -> Preferences {
        match self.try_load() {
            Ok(prefs) => prefs,
            Err(e) => {
                log::debug!("using default preferences: {e}");
                Preferences::default()
            }
        }
    }

    fn try_load(&self) -> Result<Preferences> {
        let path = self.path.as_deref().ok_or(DuskError::NoSettingsDir)?;
        let data = fs::read(path)?;
        let value: Value = serde_json::from_slice(&data)?;
        if value.get("version").and_then(Value::as_u64) != Some(u64::from(SETTINGS_VERSION)) {
            log::debug!("settings file {} has an unexpected version", path.display());
        }
        Ok(Preferences::from_value(&value))
    }

    /// Write `prefs`, replacing any previous content.
    ///
    /// Creates the parent directory if it does not exist.
    pub(crate) fn save(&self, prefs: &Preferences) -> Result<()> {
        let path = self.path.as_deref().ok_or(DuskError::NoSettingsDir)?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let sf = SettingsFile {
            version: SETTINGS_VERSION,
            prefs,
        };

        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, &sf)?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::new(Some(dir.path().join("nested").join("settings.json")))
    }

    fn sample() -> Preferences {
        Preferences {
            font_family: "Fira Code".to_owned(),
            font_size: 14,
            word_wrap: false,
            show_status_bar: false,
            recent_files: vec!["/tmp/b.txt".to_owned(), "/tmp/a.txt".to_owned()],
            window_geometry: "1024x768+10+20".to_owned(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        let prefs = sample();
        store.save(&prefs).expect("save");
        assert_eq!(store.load(), prefs);
    }

    #[test]
    fn defaults_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.save(&Preferences::default()).expect("save");
        assert_eq!(store.load(), Preferences::default());
    }

    #[test]
    fn saved_record_uses_camel_case_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.save(&sample()).expect("save");
        let text = fs::read_to_string(store.path().expect("path")).expect("read");
        let value: Value = serde_json::from_str(&text).expect("json");
        for key in [
            "version",
            "fontFamily",
            "fontSize",
            "wordWrap",
            "showStatusBar",
            "recentFiles",
            "windowGeometry",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(store_in(&dir).load(), Preferences::default());
    }

    #[test]
    fn garbage_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        fs::write(&path, b"{not json").expect("write");
        assert_eq!(SettingsStore::new(Some(path)).load(), Preferences::default());
    }

    #[test]
    fn non_object_record_loads_defaults() {
        assert_eq!(
            Preferences::from_value(&json!([1, 2, 3])),
            Preferences::default()
        );
    }

    #[test]
    fn malformed_keys_fall_back_individually() {
        let prefs = Preferences::from_value(&json!({
            "fontFamily": 42,
            "fontSize": 500,
            "wordWrap": false,
            "showStatusBar": "yes",
            "recentFiles": ["/a", 7, "/b", "/a"],
        }));
        assert_eq!(prefs.font_family, DEFAULT_FONT_FAMILY);
        assert_eq!(prefs.font_size, DEFAULT_FONT_SIZE);
        assert!(!prefs.word_wrap);
        assert!(prefs.show_status_bar);
        assert_eq!(prefs.recent_files, vec!["/a", "/b"]);
        assert_eq!(prefs.window_geometry, DEFAULT_GEOMETRY);
    }

    #[test]
    fn oversized_recent_list_is_truncated_on_load() {
        let files: Vec<String> = (0..15).map(|i| format!("/f{i}")).collect();
        let prefs = Preferences::from_value(&json!({ "recentFiles": files }));
        assert_eq!(prefs.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(prefs.recent_files[0], "/f0");
        assert_eq!(prefs.recent_files[9], "/f9");
    }

    #[test]
    fn add_recent_file_moves_to_front_without_duplicates() {
        let mut prefs = Preferences::default();
        prefs.add_recent_file("/a");
        prefs.add_recent_file("/b");
        prefs.add_recent_file("/a");
        assert_eq!(prefs.recent_files, vec!["/a", "/b"]);
    }

    #[test]
    fn add_recent_file_caps_list() {
        let mut prefs = Preferences::default();
        for i in 0..25 {
            prefs.add_recent_file(&format!("/file{}", i % 13));
            assert!(prefs.recent_files.len() <= MAX_RECENT_FILES);
            let mut sorted = prefs.recent_files.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), prefs.recent_files.len(), "duplicate entry");
        }
        assert_eq!(prefs.recent_files[0], "/file11");
    }

    #[test]
    fn zoom_is_bounded() {
        let mut prefs = Preferences::default();
        assert_eq!(prefs.zoom_percent(), 100);
        assert!(prefs.zoom_in());
        assert_eq!(prefs.font_size, 12);
        assert!(prefs.zoom_reset());
        assert!(!prefs.zoom_reset());

        prefs.font_size = *FONT_SIZE_RANGE.start();
        assert!(!prefs.zoom_out());
        prefs.font_size = *FONT_SIZE_RANGE.end();
        assert!(!prefs.zoom_in());
    }

    #[test]
    fn save_without_path_fails() {
        let store = SettingsStore { path: None };
        assert!(matches!(
            store.save(&Preferences::default()),
            Err(DuskError::NoSettingsDir)
        ));
        assert_eq!(store.load(), Preferences::default());
    }
}
