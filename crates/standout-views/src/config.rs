//! View configuration.
//!
//! [`ViewConfig`] is the long-lived configuration owned by a
//! [`Renderer`](crate::Renderer): where to look for views, which extension to
//! assume, which engine renders which extension, and the optional layout.
//!
//! Every field is addressable by a string key, so the same configuration can
//! be set programmatically, loaded from YAML or JSON, or overridden per call
//! by placing the key in the render data:
//!
//! | Key | Field | Default |
//! |-----|-------|---------|
//! | `viewDirs` | [`view_dirs`](ViewConfig::view_dirs) | empty |
//! | `viewExt` | [`view_ext`](ViewConfig::view_ext) | `"html"` |
//! | `viewEngines` | [`view_engines`](ViewConfig::view_engines) | empty |
//! | `viewLayout` | [`view_layout`](ViewConfig::view_layout) | none |
//! | `viewPlaceholder` | [`view_placeholder`](ViewConfig::view_placeholder) | `"body"` |
//!
//! A sixth key, `viewDir`, is only meaningful per call: it appends one extra
//! directory to the search list of that call.
//!
//! # Example
//!
//! ```rust
//! use standout_views::ViewConfig;
//!
//! let config = ViewConfig::from_yaml(r#"
//! viewDirs: [views, shared/views]
//! viewEngines:
//!   html: minijinja
//!   txt: plain
//! viewLayout: layout
//! "#).unwrap();
//!
//! assert_eq!(config.view_dirs.len(), 2);
//! assert_eq!(config.view_ext, "html");
//! assert_eq!(config.view_layout.as_deref(), Some("layout"));
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ViewError;

/// Key for the ordered list of view directories.
pub const KEY_DIRS: &str = "viewDirs";
/// Key for the default extension.
pub const KEY_EXT: &str = "viewExt";
/// Key for the extension to engine id mapping.
pub const KEY_ENGINES: &str = "viewEngines";
/// Key for the layout script name.
pub const KEY_LAYOUT: &str = "viewLayout";
/// Key for the placeholder the content is injected under.
pub const KEY_PLACEHOLDER: &str = "viewPlaceholder";
/// Per-call key for one additional view directory.
pub const KEY_EXTRA_DIR: &str = "viewDir";

/// All keys stored in [`ViewConfig`].
pub const CONFIG_KEYS: &[&str] = &[KEY_DIRS, KEY_EXT, KEY_ENGINES, KEY_LAYOUT, KEY_PLACEHOLDER];

/// Default extension used when a script is requested without one.
pub const DEFAULT_EXT: &str = "html";
/// Default context key for the rendered content inside a layout.
pub const DEFAULT_PLACEHOLDER: &str = "body";

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewConfig {
    /// Directories searched in order; the first one containing the script wins.
    #[serde(deserialize_with = "one_or_many")]
    pub view_dirs: Vec<PathBuf>,

    /// Extension assumed for scripts requested without one, with or without
    /// the leading dot.
    pub view_ext: String,

    /// Extension (without the dot) to engine id.
    pub view_engines: BTreeMap<String, String>,

    /// Layout script wrapping every render. `None` disables layouts.
    pub view_layout: Option<String>,

    /// Context key the rendered content is stored under when the layout renders.
    pub view_placeholder: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            view_dirs: Vec::new(),
            view_ext: DEFAULT_EXT.to_string(),
            view_engines: BTreeMap::new(),
            view_layout: None,
            view_placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl ViewConfig {
    /// Creates a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a view directory.
    pub fn with_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.view_dirs.push(dir.into());
        self
    }

    /// Sets the default extension.
    pub fn with_ext(mut self, ext: impl Into<String>) -> Self {
        self.view_ext = ext.into();
        self
    }

    /// Maps an extension to an engine id. A leading dot on `ext` is ignored.
    pub fn with_engine(mut self, ext: &str, engine: impl Into<String>) -> Self {
        self.view_engines
            .insert(ext.trim_start_matches('.').to_string(), engine.into());
        self
    }

    /// Sets the layout script.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.view_layout = Some(layout.into());
        self
    }

    /// Sets the placeholder key for layout content.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.view_placeholder = placeholder.into();
        self
    }

    /// Returns the layout to apply, treating an empty name as no layout.
    pub fn layout(&self) -> Option<&str> {
        self.view_layout.as_deref().filter(|name| !name.is_empty())
    }

    /// Returns true if `key` addresses a field of this struct.
    pub fn is_config_key(key: &str) -> bool {
        CONFIG_KEYS.contains(&key)
    }

    /// Stores a value under a configuration key.
    ///
    /// Returns `Ok(false)` without touching anything when `key` is not a
    /// configuration key, so callers can route it elsewhere. `viewDirs`
    /// accepts a single path as well as a list, and `null` clears
    /// `viewLayout`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidConfig`] if the value has the wrong shape.
    pub fn set(&mut self, key: &str, value: Value) -> Result<bool, ViewError> {
        match key {
            KEY_DIRS => {
                self.view_dirs =
                    one_or_many(value).map_err(|e| ViewError::invalid_config(key, e))?
            }
            KEY_EXT => self.view_ext = from_value(key, value)?,
            KEY_ENGINES => {
                let engines: BTreeMap<String, String> = from_value(key, value)?;
                self.view_engines = engines
                    .into_iter()
                    .map(|(ext, engine)| (ext.trim_start_matches('.').to_string(), engine))
                    .collect();
            }
            KEY_LAYOUT => self.view_layout = from_value(key, value)?,
            KEY_PLACEHOLDER => self.view_placeholder = from_value(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Reads a configuration key as JSON.
    ///
    /// Returns `None` for unknown keys and for an unset layout.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            KEY_DIRS => Some(Value::Array(
                self.view_dirs
                    .iter()
                    .map(|dir| Value::String(dir.to_string_lossy().into_owned()))
                    .collect(),
            )),
            KEY_EXT => Some(Value::String(self.view_ext.clone())),
            KEY_ENGINES => Some(Value::Object(
                self.view_engines
                    .iter()
                    .map(|(ext, engine)| (ext.clone(), Value::String(engine.clone())))
                    .collect(),
            )),
            KEY_LAYOUT => self.view_layout.clone().map(Value::String),
            KEY_PLACEHOLDER => Some(Value::String(self.view_placeholder.clone())),
            _ => None,
        }
    }

    /// Parses a configuration from YAML. Absent keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ViewError> {
        serde_yaml::from_str(yaml).map_err(|e| ViewError::ConfigParse {
            format: "yaml",
            message: e.to_string(),
        })
    }

    /// Parses a configuration from JSON. Absent keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ViewError> {
        serde_json::from_str(json).map_err(|e| ViewError::ConfigParse {
            format: "json",
            message: e.to_string(),
        })
    }

    /// Loads a configuration file, choosing the format by extension
    /// (`.yaml`/`.yml` or `.json`).
    ///
    /// Relative `viewDirs` are kept as written; they are resolved against the
    /// working directory at render time, not against the file's location.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ViewError> {
        let path = path.as_ref();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let content = std::fs::read_to_string(path).map_err(|source| ViewError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        match ext {
            "yaml" | "yml" => Self::from_yaml(&content),
            "json" => Self::from_json(&content),
            _ => Err(ViewError::invalid_config(
                &path.display().to_string(),
                "unsupported configuration format (expected .yaml, .yml or .json)",
            )),
        }
    }
}

fn from_value<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, ViewError> {
    serde_json::from_value(value).map_err(|e| ViewError::invalid_config(key, e))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

/// Accepts either a single directory or a list of directories.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<PathBuf>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(dir) => vec![dir],
        OneOrMany::Many(dirs) => dirs,
    })
}
