//! Typed per-call overrides.
//!
//! Anything set here applies to a single [`Renderer::render_with`] call and
//! is layered over the instance configuration and over configuration keys
//! found in the render data. The instance configuration is never modified.
//!
//! [`Renderer::render_with`]: crate::Renderer::render_with

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::config::ViewConfig;

/// Overrides for one render call.
///
/// # Example
///
/// ```rust
/// use standout_views::RenderOptions;
///
/// let options = RenderOptions::new()
///     .layout("admin/layout")
///     .extra_dir("plugins/billing/views");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    dirs: Option<Vec<PathBuf>>,
    ext: Option<String>,
    engines: BTreeMap<String, String>,
    layout: Option<Option<String>>,
    placeholder: Option<String>,
    extra_dir: Option<PathBuf>,
}

impl RenderOptions {
    /// Creates an empty set of overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the directory list for this call.
    pub fn dirs<I, P>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs = Some(dirs.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the default extension for this call.
    pub fn ext(mut self, ext: impl Into<String>) -> Self {
        self.ext = Some(ext.into());
        self
    }

    /// Adds or replaces one extension mapping for this call.
    pub fn engine(mut self, ext: &str, engine: impl Into<String>) -> Self {
        self.engines
            .insert(ext.trim_start_matches('.').to_string(), engine.into());
        self
    }

    /// Wraps this call's output in the given layout.
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(Some(layout.into()));
        self
    }

    /// Disables the layout for this call, even if one is configured.
    pub fn no_layout(mut self) -> Self {
        self.layout = Some(None);
        self
    }

    /// Replaces the layout placeholder key for this call.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Appends one directory to the end of this call's search list.
    pub fn extra_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extra_dir = Some(dir.into());
        self
    }

    /// Applies the overrides to an effective configuration.
    pub(crate) fn apply(&self, config: &mut ViewConfig) {
        if let Some(dirs) = &self.dirs {
            config.view_dirs = dirs.clone();
        }
        if let Some(ext) = &self.ext {
            config.view_ext = ext.clone();
        }
        config.view_engines.extend(
            self.engines
                .iter()
                .map(|(ext, engine)| (ext.clone(), engine.clone())),
        );
        if let Some(layout) = &self.layout {
            config.view_layout = layout.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            config.view_placeholder = placeholder.clone();
        }
        if let Some(dir) = &self.extra_dir {
            config.view_dirs.push(dir.clone());
        }
    }
}
