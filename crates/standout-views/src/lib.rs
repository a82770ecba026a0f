//! # Standout Views - View Rendering with Layouts
//!
//! `standout-views` renders named views from a prioritized list of
//! directories. It finds the file for a logical name, hands it to the
//! template engine registered for its extension, and optionally wraps the
//! result in a layout.
//!
//! The crate does not parse templates itself. Engines are pluggable through
//! the [`ViewEngine`] trait; a MiniJinja engine is included.
//!
//! ## Core Concepts
//!
//! - [`ViewConfig`]: view directories, default extension, extension to engine
//!   mapping, layout and placeholder
//! - [`Renderer`]: resolves, dispatches and composes; one instance serves
//!   concurrent renders
//! - [`EngineRegistry`]: engine implementations keyed by id
//! - [`RenderOptions`]: typed per-call overrides
//! - [`Hooks`]: optional notifications around each engine call
//!
//! ## Quick Start
//!
//! ```rust
//! use standout_views::{EngineRegistry, Renderer, ViewConfig};
//! use serde_json::json;
//!
//! # let runtime = tokio::runtime::Runtime::new().unwrap();
//! # runtime.block_on(async {
//! let views = tempfile::tempdir().unwrap();
//! std::fs::write(views.path().join("hello.html"), "<h1>Hello {{ name }}</h1>").unwrap();
//! std::fs::write(views.path().join("layout.html"), "<main>{{ body }}</main>").unwrap();
//!
//! let config = ViewConfig::new()
//!     .with_dir(views.path())
//!     .with_engine("html", "minijinja")
//!     .with_layout("layout");
//! let renderer = Renderer::new(config, EngineRegistry::with_builtins());
//!
//! let html = renderer.render("hello", &json!({"name": "Ada"})).await.unwrap();
//! assert_eq!(html, "<main><h1>Hello Ada</h1></main>");
//! # });
//! ```
//!
//! ## Resolution
//!
//! `"users/show"` with directories `[app/views, shared/views]` and extension
//! `html` resolves to the first existing of `app/views/users/show.html` and
//! `shared/views/users/show.html`. A name that is already a path to an
//! existing file is used as is. See [`resolve`].
//!
//! ## Per-Call Overrides
//!
//! Configuration keys inside the render data override the instance
//! configuration for that call only:
//!
//! ```rust,ignore
//! renderer.render("report", &json!({
//!     "viewLayout": "print",          // different layout
//!     "viewDir": "plugins/reports",   // one more directory, searched last
//!     "title": "Q3",                  // ordinary template data
//! })).await?;
//! ```
//!
//! The same overrides are available as [`RenderOptions`] through
//! [`Renderer::render_with`].
//!
//! ## Logging
//!
//! Resolution and dispatch emit [`tracing`] events at `debug` and `trace`
//! level. Install a subscriber in the application to see them.

pub mod config;
pub mod engine;
mod error;
pub mod fs;
pub mod hooks;
mod options;
mod renderer;
pub mod resolve;

pub use config::ViewConfig;
pub use engine::{Context, EngineRegistry, FnEngine, MiniJinjaEngine, ViewEngine};
pub use error::{EngineError, ErrorKind, ViewError};
pub use fs::{Filesystem, LocalFs, MemoryFs};
pub use hooks::{Hooks, RenderEvent, RenderPhase};
pub use options::RenderOptions;
pub use renderer::{Renderer, SelectedEngine};
