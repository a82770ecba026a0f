//! View renderer.
//!
//! [`Renderer`] ties the pieces together: it owns the [`ViewConfig`], the
//! [`EngineRegistry`] and instance-level template data, and turns a script
//! name plus per-call data into markup.
//!
//! # Pipeline
//!
//! ```text
//! render("users/show", data)
//!   1. effective config = instance config
//!                         + config keys found in data
//!                         + RenderOptions
//!                         + extra directory (viewDir)
//!   2. context          = instance locals + data (data wins)
//!   3. content          = engine_for(script).render(resolve(script), context)
//!   4. with a layout:
//!        context[placeholder] = content
//!        output = engine_for(layout).render(resolve(layout), context)
//! ```
//!
//! The engine is selected before the script is resolved, so an extension
//! without an engine is reported as a configuration problem even when the
//! file does not exist.
//!
//! Each call builds its effective configuration from a copy. Overrides,
//! including the extra directory, never leak into the renderer or into
//! concurrent calls.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{ViewConfig, CONFIG_KEYS, KEY_EXTRA_DIR};
use crate::engine::{Context, EngineRegistry, ViewEngine};
use crate::error::ViewError;
use crate::fs::{Filesystem, LocalFs};
use crate::hooks::{Hooks, RenderEvent, RenderPhase};
use crate::options::RenderOptions;
use crate::resolve::{self, script_extension};

/// The engine chosen for a script.
#[derive(Clone)]
pub struct SelectedEngine {
    /// The engine id from `viewEngines`.
    pub id: String,
    /// The extension the id was looked up by, without the dot.
    pub extension: String,
    /// The engine implementation.
    pub engine: Arc<dyn ViewEngine>,
}

impl fmt::Debug for SelectedEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedEngine")
            .field("id", &self.id)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

/// Renders views from directories through pluggable engines.
///
/// `Renderer` is `Send + Sync`; `render` takes `&self`, so one instance can
/// serve concurrent requests.
///
/// # Example
///
/// ```rust,no_run
/// use standout_views::{EngineRegistry, Renderer, ViewConfig};
/// use serde_json::json;
///
/// # async fn run() -> Result<(), standout_views::ViewError> {
/// let config = ViewConfig::new()
///     .with_dir("app/views")
///     .with_dir("shared/views")
///     .with_engine("html", "minijinja")
///     .with_layout("layout");
///
/// let renderer = Renderer::new(config, EngineRegistry::with_builtins());
///
/// // app/views/users/show.html, wrapped in layout.html under {{ body }}
/// let html = renderer
///     .render("users/show", &json!({"name": "Ada"}))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Renderer {
    config: ViewConfig,
    locals: Context,
    engines: EngineRegistry,
    fs: Arc<dyn Filesystem>,
    hooks: Hooks,
}

impl Renderer {
    /// Creates a renderer reading views from the local filesystem.
    pub fn new(config: ViewConfig, engines: EngineRegistry) -> Self {
        Self {
            config,
            locals: Context::new(),
            engines,
            fs: Arc::new(LocalFs),
            hooks: Hooks::new(),
        }
    }

    /// Replaces the filesystem used for path resolution.
    ///
    /// Engines still read template files themselves.
    pub fn with_filesystem<F>(mut self, fs: F) -> Self
    where
        F: Filesystem + 'static,
    {
        self.fs = Arc::new(fs);
        self
    }

    /// Installs render notifications.
    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Returns the instance configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns the instance configuration for modification.
    pub fn config_mut(&mut self) -> &mut ViewConfig {
        &mut self.config
    }

    /// Returns the engine registry.
    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    /// Returns the engine registry for modification.
    pub fn engines_mut(&mut self) -> &mut EngineRegistry {
        &mut self.engines
    }

    /// Stores a value by key.
    ///
    /// Configuration keys (`viewDirs`, `viewExt`, `viewEngines`,
    /// `viewLayout`, `viewPlaceholder`) update the configuration; any other
    /// key becomes instance-level template data, visible to every render
    /// unless the call's data shadows it. Last write wins.
    ///
    /// `viewDir` only applies to a single render and is rejected here; use
    /// `viewDirs` to change the directories of every render.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidConfig`] if the value cannot be serialized,
    /// has the wrong shape for a configuration key, or `key` is `viewDir`.
    pub fn set<V: Serialize>(&mut self, key: &str, value: V) -> Result<(), ViewError> {
        if key == KEY_EXTRA_DIR {
            return Err(ViewError::invalid_config(
                key,
                "only valid in render data; use viewDirs for every render",
            ));
        }
        let value = serde_json::to_value(value).map_err(|e| ViewError::invalid_config(key, e))?;
        if !ViewConfig::is_config_key(key) {
            self.locals.insert(key.to_string(), value);
            return Ok(());
        }
        self.config.set(key, value)?;
        Ok(())
    }

    /// Reads a value by key, from the configuration or the instance data.
    ///
    /// Returns `None` if the key was never set (and for an unset layout).
    pub fn get(&self, key: &str) -> Option<Value> {
        if ViewConfig::is_config_key(key) {
            return self.config.get(key);
        }
        self.locals.get(key).cloned()
    }

    /// Builds the configuration one call renders with.
    ///
    /// Starts from a copy of the instance configuration, applies
    /// configuration keys present in `data`, appends `data["viewDir"]`, then
    /// applies `options`. A directory list set through `options` replaces
    /// everything before it, including the data's extra directory.
    pub fn effective_config(
        &self,
        data: &Context,
        options: &RenderOptions,
    ) -> Result<ViewConfig, ViewError> {
        let mut config = self.config.clone();

        for key in CONFIG_KEYS {
            if let Some(value) = data.get(*key) {
                config.set(key, value.clone())?;
            }
        }

        if let Some(value) = data.get(KEY_EXTRA_DIR) {
            let dir: PathBuf = serde_json::from_value(value.clone())
                .map_err(|e| ViewError::invalid_config(KEY_EXTRA_DIR, e))?;
            config.view_dirs.push(dir);
        }

        options.apply(&mut config);
        Ok(config)
    }

    /// Picks the engine for `script` under `config`.
    ///
    /// The extension is the script's own, or the default extension when the
    /// script has none.
    ///
    /// # Errors
    ///
    /// - [`ViewError::NoEngines`] if `viewEngines` is empty
    /// - [`ViewError::EngineNotMapped`] if the extension has no entry
    /// - [`ViewError::EngineNotRegistered`] if the entry names an unknown engine
    pub fn select_engine(
        &self,
        script: &str,
        config: &ViewConfig,
    ) -> Result<SelectedEngine, ViewError> {
        let extension = match script_extension(script) {
            Some(ext) => ext.to_string(),
            None => config.view_ext.trim_start_matches('.').to_string(),
        };

        if config.view_engines.is_empty() {
            return Err(ViewError::NoEngines {
                script: script.to_string(),
            });
        }

        let id = config
            .view_engines
            .get(&extension)
            .ok_or_else(|| ViewError::EngineNotMapped {
                script: script.to_string(),
                extension: extension.clone(),
            })?;

        let engine = self
            .engines
            .get(id)
            .ok_or_else(|| ViewError::EngineNotRegistered {
                script: script.to_string(),
                engine: id.clone(),
                extension: extension.clone(),
            })?;

        debug!(script, extension = %extension, engine = %id, "selected engine");
        Ok(SelectedEngine {
            id: id.clone(),
            extension,
            engine,
        })
    }

    /// Resolves `script` against the directories and extension of `config`.
    pub async fn resolve(&self, script: &str, config: &ViewConfig) -> Result<PathBuf, ViewError> {
        resolve::resolve(
            self.fs.as_ref(),
            script,
            &config.view_dirs,
            &config.view_ext,
        )
        .await
    }

    /// Renders `script` with `data`.
    ///
    /// `data` must serialize to an object (or to nothing, e.g. `()`). Its
    /// configuration keys override the instance configuration for this call
    /// only; all of it is visible to the templates.
    ///
    /// # Errors
    ///
    /// Any failure aborts the render; see [`ViewError::kind`] for the stage.
    pub async fn render<T>(&self, script: &str, data: &T) -> Result<String, ViewError>
    where
        T: Serialize + ?Sized,
    {
        self.render_with(script, &RenderOptions::default(), data)
            .await
    }

    /// Renders `script` with `data` and typed per-call overrides.
    pub async fn render_with<T>(
        &self,
        script: &str,
        options: &RenderOptions,
        data: &T,
    ) -> Result<String, ViewError>
    where
        T: Serialize + ?Sized,
    {
        let data = to_context(data)?;
        let config = self.effective_config(&data, options)?;

        let mut context = self.locals.clone();
        context.extend(data);

        debug!(script, layout = config.layout(), "rendering view");
        let content = self
            .render_phase(RenderPhase::Content, script, &config, &context)
            .await?;

        let Some(layout) = config.layout() else {
            return Ok(content);
        };

        debug!(
            script,
            layout,
            placeholder = %config.view_placeholder,
            "wrapping content in layout"
        );
        context.insert(config.view_placeholder.clone(), Value::String(content));
        self.render_phase(RenderPhase::Layout, layout, &config, &context)
            .await
    }

    async fn render_phase(
        &self,
        phase: RenderPhase,
        script: &str,
        config: &ViewConfig,
        context: &Context,
    ) -> Result<String, ViewError> {
        let selected = self.select_engine(script, config)?;
        let path = self.resolve(script, config).await?;

        let event = RenderEvent {
            phase,
            script,
            path: &path,
            engine: &selected.id,
        };
        self.hooks.run_before(&event);

        let output = selected
            .engine
            .render(&path, context)
            .await
            .map_err(|source| ViewError::Engine {
                engine: selected.id.clone(),
                script: script.to_string(),
                path: path.clone(),
                source,
            })?;

        self.hooks.run_after(&event, &output);
        Ok(output)
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("locals", &self.locals)
            .field("engines", &self.engines)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Serializes render data into a flat context.
fn to_context<T>(data: &T) -> Result<Context, ViewError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(data).map_err(|e| ViewError::InvalidData(e.to_string()))? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Context::new()),
        Value::Array(_) => Err(ViewError::InvalidData("an array".to_string())),
        Value::String(_) => Err(ViewError::InvalidData("a string".to_string())),
        Value::Number(_) => Err(ViewError::InvalidData("a number".to_string())),
        Value::Bool(_) => Err(ViewError::InvalidData("a boolean".to_string())),
    }
}
