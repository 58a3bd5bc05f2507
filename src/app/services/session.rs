//! State carried across runs: working directory, open notes, window layout.
//!
//! The application only talks to a [`SettingsStore`]; the JSON file store is
//! the production implementation. Loading never fails: anything absent or
//! malformed is dropped key by key and replaced by its default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::app::controllers::preview::LayoutState;
use crate::app::infrastructure::error::Result;

const KEY_DIRECTORY: &str = "current_directory";
const KEY_OPEN_FILES: &str = "open_files";
const KEY_GEOMETRY: &str = "geometry";
const KEY_WINDOW_STATE: &str = "window_state";

/// A note that had a backing path when the app last exited.
///
/// `content` is the in-memory text at exit, so edits survive even if the
/// file vanished in the meantime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenFileEntry {
    pub path: PathBuf,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PersistedState {
    pub current_directory: Option<PathBuf>,
    pub open_files: Vec<OpenFileEntry>,
    pub geometry: Option<WindowGeometry>,
    pub window_state: Option<LayoutState>,
}

impl PersistedState {
    /// Parse stored JSON, keeping every key that is well-formed.
    pub fn from_json(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                warn!("Persisted state is not valid JSON ({}); starting fresh", e);
                Self::default()
            }
        }
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            warn!("Persisted state is not a JSON object; starting fresh");
            return Self::default();
        };

        Self {
            current_directory: field(obj, KEY_DIRECTORY),
            open_files: open_files(obj.get(KEY_OPEN_FILES)),
            geometry: field(obj, KEY_GEOMETRY),
            window_state: field(obj, KEY_WINDOW_STATE),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn field<T: DeserializeOwned>(obj: &Map<String, Value>, key: &str) -> Option<T> {
    let value = obj.get(key)?;
    if value.is_null() {
        return None;
    }
    match serde_json::from_value(value.clone()) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(key, "Ignoring malformed persisted value: {}", e);
            None
        }
    }
}

/// Accepts a JSON array or a string holding a JSON-encoded array; malformed
/// entries are skipped individually.
fn open_files(value: Option<&Value>) -> Vec<OpenFileEntry> {
    let decoded;
    let list = match value {
        Some(Value::Array(items)) => items,
        Some(Value::String(encoded)) => match serde_json::from_str::<Value>(encoded) {
            Ok(Value::Array(items)) => {
                decoded = items;
                &decoded
            }
            _ => {
                warn!("Ignoring malformed {} string", KEY_OPEN_FILES);
                return Vec::new();
            }
        },
        Some(Value::Null) | None => return Vec::new(),
        Some(_) => {
            warn!("Ignoring malformed {} value", KEY_OPEN_FILES);
            return Vec::new();
        }
    };

    list.iter()
        .filter_map(|item| match serde_json::from_value::<OpenFileEntry>(item.clone()) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping malformed open file entry: {}", e);
                None
            }
        })
        .collect()
}

/// Process-wide persisted key/value state, read once at startup and written
/// once at shutdown.
pub trait SettingsStore {
    fn load(&self) -> PersistedState;
    fn save(&mut self, state: &PersistedState) -> Result<()>;
}

/// JSON document on disk, by default `data_dir/markpad/state.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("markpad");
        path.push("state.json");
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonFileStore {
    fn load(&self) -> PersistedState {
        match fs::read_to_string(&self.path) {
            Ok(text) => PersistedState::from_json(&text),
            Err(e) => {
                debug!(path = %self.path.display(), "No persisted state ({})", e);
                PersistedState::default()
            }
        }
    }

    fn save(&mut self, state: &PersistedState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, state.to_json()?)?;
        debug!(path = %self.path.display(), files = state.open_files.len(), "saved state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> PersistedState {
        PersistedState {
            current_directory: Some(PathBuf::from("/notes")),
            open_files: vec![OpenFileEntry {
                path: PathBuf::from("/notes/fern.md"),
                content: "# Fern".to_string(),
            }],
            geometry: Some(WindowGeometry { x: 10, y: 20, width: 800, height: 600 }),
            window_state: Some(LayoutState {
                editor_visible: true,
                preview_visible: false,
            }),
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("markpad").join("state.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load(), sample());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert_eq!(store.load(), PersistedState::default());
    }

    #[test]
    fn test_garbage_loads_defaults() {
        assert_eq!(PersistedState::from_json("not json at all"), PersistedState::default());
        assert_eq!(PersistedState::from_json("[1, 2, 3]"), PersistedState::default());
    }

    #[test]
    fn test_malformed_keys_are_dropped_individually() {
        let json = r#"{
            "current_directory": 42,
            "open_files": [
                {"path": "/notes/a.md", "content": "a"},
                {"content": "no path"},
                "junk"
            ],
            "geometry": {"x": "wide"},
            "window_state": {"editor_visible": false, "preview_visible": true}
        }"#;
        let state = PersistedState::from_json(json);

        assert_eq!(state.current_directory, None);
        assert_eq!(state.open_files.len(), 1);
        assert_eq!(state.open_files[0].path, PathBuf::from("/notes/a.md"));
        assert_eq!(state.geometry, None);
        assert_eq!(
            state.window_state,
            Some(LayoutState { editor_visible: false, preview_visible: true })
        );
    }

    #[test]
    fn test_open_files_as_encoded_string() {
        let json = r#"{"open_files": "[{\"path\": \"/notes/b.md\", \"content\": \"b\"}]"}"#;
        let state = PersistedState::from_json(json);
        assert_eq!(state.open_files.len(), 1);
        assert_eq!(state.open_files[0].content, "b");
    }
}
