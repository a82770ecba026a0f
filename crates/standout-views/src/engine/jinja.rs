//! MiniJinja view engine.
//!
//! Renders view files with a [`minijinja::Environment`], giving templates the
//! full Jinja2 language.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

use super::{Context, ViewEngine};
use crate::error::EngineError;

/// MiniJinja-based view engine.
///
/// Reads the resolved template file and renders it with a shared
/// [`Environment`], so Jinja2 syntax is available: loops, conditionals,
/// filters and macros. The file's path is used as the template name, which
/// makes it show up in error messages.
///
/// Auto-escaping is off. Layouts receive already rendered markup in their
/// placeholder and must embed it verbatim; enable escaping through
/// [`environment_mut`](Self::environment_mut) if templates render untrusted
/// input.
///
/// `{% include %}` and `{% extends %}` resolve against the directory given to
/// [`with_include_dir`](Self::with_include_dir), if any.
///
/// # Example
///
/// ```rust
/// use standout_views::MiniJinjaEngine;
///
/// let engine = MiniJinjaEngine::new()
///     .with_include_dir("views/partials")
///     .strict();
/// ```
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Creates an engine with auto-escaping disabled and lenient undefined
    /// handling (missing variables render as empty strings).
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }

    /// Resolves `{% include %}` and `{% extends %}` names against `dir`.
    pub fn with_include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.env.set_loader(minijinja::path_loader(dir.into()));
        self
    }

    /// Makes use of an undefined variable a render error.
    pub fn strict(mut self) -> Self {
        self.env.set_undefined_behavior(UndefinedBehavior::Strict);
        self
    }

    /// Returns a reference to the underlying MiniJinja environment.
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }

    /// Returns a mutable reference to the underlying MiniJinja environment.
    ///
    /// This allows registering custom filters, functions, or globals.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Renders template source directly. `name` is only used in errors.
    pub fn render_source(
        &self,
        name: &str,
        source: &str,
        context: &Context,
    ) -> Result<String, EngineError> {
        Ok(self.env.render_named_str(name, source, context)?)
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ViewEngine for MiniJinjaEngine {
    async fn render(&self, path: &Path, context: &Context) -> Result<String, EngineError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EngineError::io(path, e))?;
        self.render_source(&path.display().to_string(), &source, context)
    }
}
