//! Integration tests rendering real view trees from disk.
//!
//! Each test builds a temporary directory laid out like an application's
//! views folder:
//!
//! ```text
//! T/
//!   test.html        <p>Hello</p>
//!   test2.html       <h1>Test2</h1>
//!   layout.html      <h1>From Layout{{ title }}</h1>{{ body }}
//!   views/
//!     test3.html     <p>test3{{ message }}</p>
//! ```

use std::path::Path;

use serde::Serialize;
use serde_json::json;
use serial_test::serial;
use standout_views::{
    EngineRegistry, ErrorKind, RenderOptions, Renderer, ViewConfig, ViewError,
};
use tempfile::TempDir;

fn view_tree() -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let t = root.path();
    std::fs::write(t.join("test.html"), "<p>Hello</p>").unwrap();
    std::fs::write(t.join("test2.html"), "<h1>Test2</h1>").unwrap();
    std::fs::write(
        t.join("layout.html"),
        "<h1>From Layout{{ title }}</h1>{{ body }}",
    )
    .unwrap();
    std::fs::create_dir(t.join("views")).unwrap();
    std::fs::write(
        t.join("views").join("test3.html"),
        "<p>test3{{ message }}</p>",
    )
    .unwrap();
    root
}

fn renderer_for(dirs: &[&Path]) -> Renderer {
    let mut config = ViewConfig::new().with_engine("html", "minijinja");
    for dir in dirs {
        config = config.with_dir(*dir);
    }
    Renderer::new(config, EngineRegistry::with_builtins())
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn renders_by_resolving_path() {
    let tree = view_tree();
    let renderer = renderer_for(&[tree.path()]);

    let output = renderer.render("test2", &json!({})).await.unwrap();
    assert_eq!(output, "<h1>Test2</h1>");
}

#[tokio::test]
async fn wraps_content_in_layout() {
    let tree = view_tree();
    let renderer = renderer_for(&[tree.path()]);

    let output = renderer
        .render("test2", &json!({"viewLayout": "layout"}))
        .await
        .unwrap();
    assert_eq!(output, "<h1>From Layout</h1><h1>Test2</h1>");
}

#[tokio::test]
async fn passes_data_to_layout() {
    let tree = view_tree();
    let renderer = renderer_for(&[tree.path()]);

    let output = renderer
        .render("test2", &json!({"viewLayout": "layout", "title": "Hello"}))
        .await
        .unwrap();
    assert_eq!(output, "<h1>From LayoutHello</h1><h1>Test2</h1>");
}

#[tokio::test]
async fn searches_multiple_view_dirs() {
    let tree = view_tree();
    let views = tree.path().join("views");
    let renderer = renderer_for(&[tree.path(), views.as_path()]);

    let output = renderer.render("test3", &()).await.unwrap();
    assert_eq!(output, "<p>test3</p>");
}

#[tokio::test]
async fn renders_view_data() {
    let tree = view_tree();
    let views = tree.path().join("views");
    let renderer = renderer_for(&[tree.path(), views.as_path()]);

    let output = renderer
        .render("test3", &json!({"message": "my message"}))
        .await
        .unwrap();
    assert_eq!(output, "<p>test3my message</p>");
}

#[tokio::test]
async fn renders_typed_data() {
    #[derive(Serialize)]
    struct Page<'a> {
        message: &'a str,
    }

    let tree = view_tree();
    let views = tree.path().join("views");
    let renderer = renderer_for(&[views.as_path()]);

    let output = renderer
        .render("test3", &Page { message: "typed" })
        .await
        .unwrap();
    assert_eq!(output, "<p>test3typed</p>");
}

#[tokio::test]
async fn absolute_path_bypasses_search() {
    let tree = view_tree();
    // No view dirs at all: only the direct path can match.
    let renderer = renderer_for(&[]);

    let script = tree.path().join("test.html");
    let output = renderer
        .render(script.to_str().unwrap(), &())
        .await
        .unwrap();
    assert_eq!(output, "<p>Hello</p>");
}

#[tokio::test]
#[serial]
async fn relative_path_resolves_from_working_dir() {
    let tree = view_tree();
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(tree.path()).unwrap();

    let renderer = renderer_for(&[]);
    let result = renderer.render("views/test3.html", &json!({"message": "!"})).await;

    std::env::set_current_dir(previous).unwrap();
    assert_eq!(result.unwrap(), "<p>test3!</p>");
}

// ============================================================================
// Priority and overrides
// ============================================================================

#[tokio::test]
async fn earlier_directory_shadows_later() {
    let tree = view_tree();
    let override_dir = tempfile::tempdir().unwrap();
    std::fs::write(override_dir.path().join("test2.html"), "<h1>Override</h1>").unwrap();

    let renderer = renderer_for(&[override_dir.path(), tree.path()]);
    assert_eq!(
        renderer.render("test2", &()).await.unwrap(),
        "<h1>Override</h1>"
    );

    let renderer = renderer_for(&[tree.path(), override_dir.path()]);
    assert_eq!(
        renderer.render("test2", &()).await.unwrap(),
        "<h1>Test2</h1>"
    );
}

#[tokio::test]
async fn extra_dir_applies_to_one_call_only() {
    let tree = view_tree();
    let views = tree.path().join("views");
    let renderer = renderer_for(&[tree.path()]);

    let output = renderer
        .render("test3", &json!({"viewDir": views}))
        .await
        .unwrap();
    assert_eq!(output, "<p>test3</p>");

    let err = renderer.render("test3", &()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert_eq!(renderer.config().view_dirs.len(), 1);
}

#[tokio::test]
async fn concurrent_renders_do_not_share_overrides() {
    let tree = view_tree();
    let views = tree.path().join("views");
    let renderer = renderer_for(&[tree.path()]);

    let with_extra = RenderOptions::new().extra_dir(&views);
    let ctx_a = json!({"message": "a"});
    let with_layout = RenderOptions::new().layout("layout");
    let (a, b, c) = tokio::join!(
        renderer.render_with("test3", &with_extra, &ctx_a),
        renderer.render("test3", &()),
        renderer.render_with("test2", &with_layout, &()),
    );

    assert_eq!(a.unwrap(), "<p>test3a</p>");
    assert_eq!(b.unwrap_err().kind(), ErrorKind::Resolution);
    assert_eq!(c.unwrap(), "<h1>From Layout</h1><h1>Test2</h1>");
}

#[tokio::test]
async fn mixed_engines_for_content_and_layout() {
    let root = tempfile::tempdir().unwrap();
    std::fs::write(root.path().join("receipt.txt"), "total due").unwrap();
    std::fs::write(root.path().join("frame.html"), "<pre>{{ body }} {{ total }}</pre>").unwrap();

    let mut engines = EngineRegistry::with_builtins();
    engines.register_fn("shout", |path, _context| async move {
        tokio::fs::read_to_string(&path)
            .await
            .map(|source| source.to_uppercase())
            .map_err(|e| standout_views::EngineError::io(&path, e))
    });

    let config = ViewConfig::new()
        .with_dir(root.path())
        .with_engine("html", "minijinja")
        .with_engine("txt", "shout")
        .with_layout("frame");
    let renderer = Renderer::new(config, engines);

    let output = renderer
        .render("receipt.txt", &json!({"total": 42}))
        .await
        .unwrap();
    assert_eq!(output, "<pre>TOTAL DUE 42</pre>");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn unknown_script_fails_with_resolution_error() {
    let tree = view_tree();
    let renderer = renderer_for(&[tree.path()]);

    let err = renderer.render("nowhere", &()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Resolution);
    assert!(err.to_string().contains("nowhere"));
}

#[tokio::test]
async fn empty_directory_list_fails_with_resolution_error() {
    let renderer = renderer_for(&[]);
    let err = renderer.render("test2", &()).await.unwrap_err();
    assert!(matches!(err, ViewError::Unresolved { ref searched, .. } if searched.is_empty()));
}

#[tokio::test]
async fn unmapped_extension_fails_even_when_file_exists() {
    let tree = view_tree();
    std::fs::write(tree.path().join("notes.md"), "# Notes").unwrap();
    let renderer = renderer_for(&[tree.path()]);

    let err = renderer.render("notes.md", &()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn engine_failure_surfaces_with_script_name() {
    let tree = view_tree();
    std::fs::write(tree.path().join("broken.html"), "{% if %}").unwrap();
    let renderer = renderer_for(&[tree.path()]);

    let err = renderer.render("broken", &()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Engine);
    assert_eq!(err.script(), Some("broken"));
}

#[tokio::test]
async fn custom_engine_from_closure() {
    let tree = view_tree();
    let mut engines = EngineRegistry::new();
    engines.register_fn("shout", |path, _context| async move {
        tokio::fs::read_to_string(&path)
            .await
            .map(|source| source.to_uppercase())
            .map_err(|e| standout_views::EngineError::io(&path, e))
    });

    let config = ViewConfig::new()
        .with_dir(tree.path())
        .with_engine("html", "shout");
    let renderer = Renderer::new(config, engines);

    let output = renderer.render("test2", &()).await.unwrap();
    assert_eq!(output, "<H1>TEST2</H1>");
}

#[tokio::test]
async fn config_loaded_from_yaml_file() {
    let tree = view_tree();
    let config_path = tree.path().join("views.yaml");
    std::fs::write(
        &config_path,
        format!(
            "viewDirs:\n  - {}\n  - {}\nviewEngines:\n  html: minijinja\nviewLayout: layout\n",
            tree.path().display(),
            tree.path().join("views").display()
        ),
    )
    .unwrap();

    let config = ViewConfig::from_file(&config_path).unwrap();
    let renderer = Renderer::new(config, EngineRegistry::with_builtins());

    let output = renderer
        .render("test3", &json!({"message": "yaml", "title": "!"}))
        .await
        .unwrap();
    assert_eq!(output, "<h1>From Layout!</h1><p>test3yaml</p>");
}
