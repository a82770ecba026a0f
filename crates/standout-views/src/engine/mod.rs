//! Template engine abstraction.
//!
//! This module defines the [`ViewEngine`] trait, the only contract between the
//! renderer and the code that actually turns a template into markup. An
//! engine receives a resolved file path and a flat data context and returns
//! the rendered string; reading, parsing and escaping are its own business.
//!
//! Engines are registered under string ids in an [`EngineRegistry`]; the
//! renderer's `viewEngines` configuration maps file extensions to those ids.
//!
//! [`MiniJinjaEngine`] ships with the crate and is registered as
//! `"minijinja"` by [`EngineRegistry::with_builtins`]. Any async function can
//! be plugged in with [`EngineRegistry::register_fn`].

mod jinja;

pub use jinja::MiniJinjaEngine;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::EngineError;

/// The data handed to an engine: one flat JSON object.
pub type Context = serde_json::Map<String, serde_json::Value>;

/// Id under which [`MiniJinjaEngine`] is registered by [`EngineRegistry::with_builtins`].
pub const MINIJINJA: &str = "minijinja";

/// A template engine that renders a template file with a data context.
#[async_trait]
pub trait ViewEngine: Send + Sync {
    /// Renders the template at `path`.
    ///
    /// `path` has already been resolved and is known to exist when the
    /// renderer calls this, but engines must still report read failures.
    async fn render(&self, path: &Path, context: &Context) -> Result<String, EngineError>;
}

/// Adapts an async closure to [`ViewEngine`].
///
/// The closure receives owned copies of the path and context so the
/// returned future does not borrow from the caller.
pub struct FnEngine<F> {
    f: F,
}

impl<F> FnEngine<F> {
    /// Wraps `f` as an engine.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ViewEngine for FnEngine<F>
where
    F: Fn(PathBuf, Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, EngineError>> + Send + 'static,
{
    async fn render(&self, path: &Path, context: &Context) -> Result<String, EngineError> {
        (self.f)(path.to_path_buf(), context.clone()).await
    }
}

/// Engine implementations keyed by id.
///
/// Cloning is cheap: engines are shared behind [`Arc`].
///
/// # Example
///
/// ```rust
/// use standout_views::{EngineError, EngineRegistry};
///
/// let mut engines = EngineRegistry::with_builtins();
/// engines.register_fn("upper", |path, _context| async move {
///     tokio::fs::read_to_string(&path)
///         .await
///         .map(|source| source.to_uppercase())
///         .map_err(|e| EngineError::io(&path, e))
/// });
///
/// assert_eq!(engines.ids(), vec!["minijinja", "upper"]);
/// ```
#[derive(Clone, Default)]
pub struct EngineRegistry {
    engines: HashMap<String, Arc<dyn ViewEngine>>,
}

impl EngineRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding [`MiniJinjaEngine`] under [`MINIJINJA`].
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(MINIJINJA, MiniJinjaEngine::new());
        registry
    }

    /// Registers an engine, replacing any engine with the same id.
    pub fn register<E>(&mut self, id: impl Into<String>, engine: E) -> &mut Self
    where
        E: ViewEngine + 'static,
    {
        self.engines.insert(id.into(), Arc::new(engine));
        self
    }

    /// Registers an already shared engine.
    pub fn register_shared(
        &mut self,
        id: impl Into<String>,
        engine: Arc<dyn ViewEngine>,
    ) -> &mut Self {
        self.engines.insert(id.into(), engine);
        self
    }

    /// Registers an async function as an engine.
    pub fn register_fn<F, Fut>(&mut self, id: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(PathBuf, Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, EngineError>> + Send + 'static,
    {
        self.register(id, FnEngine::new(f))
    }

    /// Looks up an engine by id.
    pub fn get(&self, id: &str) -> Option<Arc<dyn ViewEngine>> {
        self.engines.get(id).cloned()
    }

    /// Returns true if an engine is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.engines.contains_key(id)
    }

    /// Returns the registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.engines.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Returns true if no engine is registered.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.ids())
            .finish()
    }
}
