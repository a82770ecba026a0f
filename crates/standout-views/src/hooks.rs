//! Render notifications.
//!
//! Hooks let callers observe the render pipeline without taking part in it:
//! timing, access logs, template usage statistics. They run once per phase,
//! so a render with a layout fires each hook twice.
//!
//! ```text
//! render("index")
//!   → before(Content) → engine → after(Content, output)
//!   → before(Layout)  → engine → after(Layout, output)   (only with a layout)
//! ```
//!
//! Hooks cannot fail and cannot change the output.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Which of the two render phases an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    /// The requested script.
    Content,
    /// The layout wrapping the content.
    Layout,
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderPhase::Content => write!(f, "content"),
            RenderPhase::Layout => write!(f, "layout"),
        }
    }
}

/// What a hook is told about one phase.
#[derive(Debug, Clone, Copy)]
pub struct RenderEvent<'a> {
    /// The phase being rendered.
    pub phase: RenderPhase,
    /// The script name as requested (the layout name for [`RenderPhase::Layout`]).
    pub script: &'a str,
    /// The resolved file path.
    pub path: &'a Path,
    /// The engine id handling the phase.
    pub engine: &'a str,
}

type BeforeFn = Arc<dyn Fn(&RenderEvent<'_>) + Send + Sync>;
type AfterFn = Arc<dyn Fn(&RenderEvent<'_>, &str) + Send + Sync>;

/// Optional callbacks around each engine invocation.
///
/// # Example
///
/// ```rust
/// use standout_views::Hooks;
///
/// let hooks = Hooks::new()
///     .before(|event| eprintln!("rendering {} via {}", event.script, event.engine))
///     .after(|event, output| eprintln!("{} produced {} bytes", event.phase, output.len()));
/// ```
#[derive(Clone, Default)]
pub struct Hooks {
    before: Vec<BeforeFn>,
    after: Vec<AfterFn>,
}

impl Hooks {
    /// Creates an empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a callback run before each engine invocation.
    pub fn before<F>(mut self, f: F) -> Self
    where
        F: Fn(&RenderEvent<'_>) + Send + Sync + 'static,
    {
        self.before.push(Arc::new(f));
        self
    }

    /// Adds a callback run after each successful engine invocation.
    pub fn after<F>(mut self, f: F) -> Self
    where
        F: Fn(&RenderEvent<'_>, &str) + Send + Sync + 'static,
    {
        self.after.push(Arc::new(f));
        self
    }

    /// Returns true if no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    pub(crate) fn run_before(&self, event: &RenderEvent<'_>) {
        for hook in &self.before {
            hook(event);
        }
    }

    pub(crate) fn run_after(&self, event: &RenderEvent<'_>, output: &str) {
        for hook in &self.after {
            hook(event, output);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_hooks_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&log);
        let second = Arc::clone(&log);
        let third = Arc::clone(&log);

        let hooks = Hooks::new()
            .before(move |e| first.lock().unwrap().push(format!("1:{}", e.script)))
            .before(move |e| second.lock().unwrap().push(format!("2:{}", e.script)))
            .after(move |e, out| third.lock().unwrap().push(format!("{}={}", e.phase, out)));

        let event = RenderEvent {
            phase: RenderPhase::Content,
            script: "index",
            path: Path::new("views/index.html"),
            engine: "minijinja",
        };
        hooks.run_before(&event);
        hooks.run_after(&event, "<p>ok</p>");

        assert_eq!(
            *log.lock().unwrap(),
            vec!["1:index", "2:index", "content=<p>ok</p>"]
        );
    }

    #[test]
    fn test_empty() {
        assert!(Hooks::new().is_empty());
        assert!(!Hooks::new().before(|_| {}).is_empty());
    }
}
