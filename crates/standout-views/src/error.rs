//! Error types for view rendering.
//!
//! [`ViewError`] is returned by every fallible operation in this crate. Each
//! variant belongs to one stage of the render pipeline, reported by
//! [`ViewError::kind`]:
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | [`ErrorKind::Configuration`] | no engine is configured, an extension has no engine, an engine id is unregistered, or a config value has the wrong shape |
//! | [`ErrorKind::Resolution`] | a script (content or layout) exists in none of the view directories |
//! | [`ErrorKind::Engine`] | the delegated engine failed while rendering |
//!
//! [`EngineError`] is what a [`ViewEngine`](crate::ViewEngine) returns. The
//! renderer passes it through untouched, wrapped with the engine id and the
//! script that was being rendered.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The pipeline stage an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Engine mapping or configuration values are wrong.
    Configuration,
    /// A script could not be located on disk.
    Resolution,
    /// The template engine failed.
    Engine,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::Resolution => write!(f, "resolution"),
            ErrorKind::Engine => write!(f, "engine"),
        }
    }
}

/// Error type for view rendering operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// No extension is mapped to any engine.
    #[error("no template engine configured for \"{script}\" (viewEngines is empty)")]
    NoEngines {
        /// The script being rendered
        script: String,
    },

    /// The script's extension has no entry in `viewEngines`.
    #[error("engine not found for extension \"{extension}\" (script \"{script}\")")]
    EngineNotMapped {
        /// The script being rendered
        script: String,
        /// The extension that was looked up, without the leading dot
        extension: String,
    },

    /// `viewEngines` names an engine id that is not in the registry.
    #[error(
        "engine implementation not found: {engine:?} (extension {extension:?}, script {script:?})"
    )]
    EngineNotRegistered {
        /// The script being rendered
        script: String,
        /// The unregistered engine id
        engine: String,
        /// The extension that mapped to it
        extension: String,
    },

    /// A configuration key was given a value of the wrong shape.
    #[error("invalid value for \"{key}\": {message}")]
    InvalidConfig {
        /// The configuration key
        key: String,
        /// Why the value was rejected
        message: String,
    },

    /// A configuration document could not be parsed.
    #[error("failed to parse {format} view configuration: {message}")]
    ConfigParse {
        /// `"yaml"` or `"json"`
        format: &'static str,
        /// Parser message
        message: String,
    },

    /// A configuration file could not be read.
    #[error("failed to read view configuration \"{}\": {source}", path.display())]
    ConfigRead {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Render data did not serialize to an object.
    #[error("render data must serialize to an object, got {0}")]
    InvalidData(String),

    /// The script exists in none of the searched locations.
    #[error("unable to resolve script path: \"{script}\"")]
    Unresolved {
        /// The script name as requested
        script: String,
        /// Every candidate path that was probed, in order
        searched: Vec<PathBuf>,
    },

    /// The engine failed while rendering a resolved script.
    #[error("engine \"{engine}\" failed to render \"{script}\": {source}")]
    Engine {
        /// The engine id that was invoked
        engine: String,
        /// The script name as requested
        script: String,
        /// The resolved path handed to the engine
        path: PathBuf,
        /// The engine's own error
        #[source]
        source: EngineError,
    },
}

impl ViewError {
    /// Returns the pipeline stage this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ViewError::NoEngines { .. }
            | ViewError::EngineNotMapped { .. }
            | ViewError::EngineNotRegistered { .. }
            | ViewError::InvalidConfig { .. }
            | ViewError::ConfigParse { .. }
            | ViewError::ConfigRead { .. }
            | ViewError::InvalidData(_) => ErrorKind::Configuration,
            ViewError::Unresolved { .. } => ErrorKind::Resolution,
            ViewError::Engine { .. } => ErrorKind::Engine,
        }
    }

    /// Returns the script name the error refers to, if any.
    pub fn script(&self) -> Option<&str> {
        match self {
            ViewError::NoEngines { script }
            | ViewError::EngineNotMapped { script, .. }
            | ViewError::EngineNotRegistered { script, .. }
            | ViewError::Unresolved { script, .. }
            | ViewError::Engine { script, .. } => Some(script),
            _ => None,
        }
    }

    pub(crate) fn invalid_config(key: &str, message: impl fmt::Display) -> Self {
        ViewError::InvalidConfig {
            key: key.to_string(),
            message: message.to_string(),
        }
    }
}

/// Error returned by a [`ViewEngine`](crate::ViewEngine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The template file could not be read.
    #[error("failed to read \"{}\": {source}", path.display())]
    Io {
        /// Path of the template file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Template syntax or evaluation error.
    #[error("{0}")]
    Template(String),

    /// Any other failure raised by a custom engine.
    #[error("{0}")]
    Custom(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl EngineError {
    /// Creates an I/O error for the given template path.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Wraps an arbitrary error raised by a custom engine.
    pub fn custom<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        EngineError::Custom(err.into())
    }
}

impl From<minijinja::Error> for EngineError {
    fn from(err: minijinja::Error) -> Self {
        EngineError::Template(err.to_string())
    }
}
