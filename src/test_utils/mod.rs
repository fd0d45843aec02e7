//! Test utilities for Stencil
//!
//! Helpers for unit and integration tests: opt-in logging and throwaway apps
//! in temporary directories.
//!
//! # Example
//!
//! ```rust,no_run
//! use stencil_cli::test_utils::TestApp;
//! use serde_json::json;
//!
//! let test_app = TestApp::new("guestbook");
//! test_app.write_component("", "web", "jsonnet", json!({"replicas": 1}));
//! assert!(test_app.app.components_dir().join("web.jsonnet").is_file());
//! ```

use serde_json::Value;
use std::path::Path;
use std::sync::Once;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

use crate::actions::init_app;
use crate::app::App;
use crate::component::Namespace;
use crate::utils::ensure_dir;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// Does nothing unless `RUST_LOG` is set:
///
/// ```bash
/// RUST_LOG=stencil_cli=debug cargo test
/// ```
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// An initialized app in a temporary directory, removed on drop.
///
/// The app has the `default` environment, like one created by `stencil init`.
pub struct TestApp {
    temp_dir: TempDir,
    /// The loaded app
    pub app: App,
}

impl TestApp {
    /// Create an app called `name`.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory or the app cannot be created.
    #[must_use]
    pub fn new(name: &str) -> Self {
        init_test_logging();

        let temp_dir = TempDir::new().expect("create temp dir");
        let app = init_app(temp_dir.path(), name).expect("initialize test app");
        Self {
            temp_dir,
            app,
        }
    }

    /// The app root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a component file and its entry in the namespace's `params.json`.
    ///
    /// # Panics
    ///
    /// Panics if a file cannot be written.
    pub fn write_component(&self, namespace: &str, name: &str, ext: &str, params: Value) {
        let ns = Namespace::new(&self.app, namespace);
        ensure_dir(ns.dir()).expect("create namespace dir");
        std::fs::write(ns.dir().join(format!("{name}.{ext}")), "{}\n").expect("write component");

        let mut doc = ns.load_params().expect("load namespace params");
        doc.components.insert(name.to_string(), params);
        ns.save_params(&doc).expect("save namespace params");
    }

    /// Write a prototype definition into the app's `prototypes/` library.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_prototype(&self, file_name: &str, text: &str) {
        let dir = self.root().join(crate::constants::PROTOTYPES_DIR);
        ensure_dir(&dir).expect("create prototypes dir");
        std::fs::write(dir.join(file_name), text).expect("write prototype");
    }
}
