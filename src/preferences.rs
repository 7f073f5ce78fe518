//! Persisted user preferences.
//!
//! [`Preferences`] holds the two settings that survive a restart: the symbol
//! name and the luminance-to-alpha toggle. It serializes to camelCase JSON:
//!
//! ```json
//! {
//!   "symbolName": "person.fill",
//!   "luminanceToAlpha": true
//! }
//! ```
//!
//! Missing fields fall back to their defaults, so `{}` is a valid file.
//!
//! # Example
//!
//! ```
//! use folder_icon_generator::Preferences;
//!
//! let prefs = Preferences::default().with_symbol_name("star.fill");
//! let json = prefs.to_json().unwrap();
//!
//! let restored = Preferences::from_json(&json).unwrap();
//! assert_eq!(restored.symbol_name, "star.fill");
//! assert!(restored.luminance_to_alpha);
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::PreferencesError;
use crate::layer::glyph::DEFAULT_SYMBOL_NAME;

const PREFERENCES_FILE: &str = "preferences.json";

// ============================================================================
// Preferences
// ============================================================================

/// User settings that persist across launches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Glyph drawn when no custom icon is set.
    #[serde(default = "default_symbol_name")]
    pub symbol_name: String,

    /// Whether a custom icon is turned into a luminance mask.
    #[serde(default = "default_true")]
    pub luminance_to_alpha: bool,
}

fn default_symbol_name() -> String {
    DEFAULT_SYMBOL_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            symbol_name: default_symbol_name(),
            luminance_to_alpha: true,
        }
    }
}

impl Preferences {
    /// Sets the symbol name.
    pub fn with_symbol_name(mut self, name: impl Into<String>) -> Self {
        self.symbol_name = name.into();
        self
    }

    /// Sets the luminance-to-alpha flag.
    pub fn with_luminance_to_alpha(mut self, enabled: bool) -> Self {
        self.luminance_to_alpha = enabled;
        self
    }

    /// Serializes to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// JSON schema of the preferences file.
    #[cfg(feature = "jsonschema")]
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Preferences)
    }
}

// ============================================================================
// PreferenceStore
// ============================================================================

/// Somewhere preferences can be loaded from and saved to.
pub trait PreferenceStore {
    /// Loads preferences, returning defaults if none were saved yet.
    fn load(&self) -> Result<Preferences, PreferencesError>;

    /// Persists preferences.
    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError>;
}

/// Stores preferences as a JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The per-user location, e.g.
    /// `~/Library/Application Support/folder-icon-generator/preferences.json`.
    pub fn default_location() -> Result<Self, PreferencesError> {
        let dirs = ProjectDirs::from("", "", "folder-icon-generator")
            .ok_or(PreferencesError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join(PREFERENCES_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PreferencesError {
        PreferencesError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for JsonFileStore {
    fn load(&self) -> Result<Preferences, PreferencesError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no preferences at {}; using defaults", self.path.display());
                return Ok(Preferences::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };
        Ok(Preferences::from_json(&json)?)
    }

    fn save(&self, prefs: &Preferences) -> Result<(), PreferencesError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        let json = prefs.to_json_pretty()?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        debug!("saved preferences to {}", self.path.display());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.symbol_name, DEFAULT_SYMBOL_NAME);
        assert!(prefs.luminance_to_alpha);
    }

    #[test]
    fn json_format_is_camel_case() {
        let json = Preferences::default()
            .with_symbol_name("person.fill")
            .with_luminance_to_alpha(false)
            .to_json_pretty()
            .unwrap();

        assert!(json.contains("\"symbolName\": \"person.fill\""));
        assert!(json.contains("\"luminanceToAlpha\": false"));
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        assert_eq!(Preferences::from_json("{}").unwrap(), Preferences::default());
    }

    #[test]
    fn partial_object_keeps_other_default() {
        let prefs = Preferences::from_json(r#"{"luminanceToAlpha": false}"#).unwrap();
        assert_eq!(prefs.symbol_name, DEFAULT_SYMBOL_NAME);
        assert!(!prefs.luminance_to_alpha);
    }

    #[test]
    fn file_store_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join(PREFERENCES_FILE));
        assert_eq!(store.load().unwrap(), Preferences::default());
    }

    #[test]
    fn file_store_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join(PREFERENCES_FILE));
        let prefs = Preferences::default()
            .with_symbol_name("bolt.fill")
            .with_luminance_to_alpha(false);

        store.save(&prefs).unwrap();
        assert_eq!(store.load().unwrap(), prefs);
    }

    #[test]
    fn file_store_rejects_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(path);
        assert!(matches!(store.load(), Err(PreferencesError::Json(_))));
    }

    #[cfg(feature = "jsonschema")]
    #[test]
    fn schema_names_both_fields() {
        let schema = serde_json::to_string(&Preferences::json_schema()).unwrap();
        assert!(schema.contains("symbolName"));
        assert!(schema.contains("luminanceToAlpha"));
    }
}
