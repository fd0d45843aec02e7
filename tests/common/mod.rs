//! Common helpers for Stencil integration tests
//!
//! Every test gets its own temporary directory holding an app created with
//! the real `stencil init`, and an isolated global config path so the
//! developer's `~/.stencil/config.toml` never leaks into a test.

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An app created by `stencil init` in a temporary directory.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    app_dir: PathBuf,
    config_path: PathBuf,
}

impl TestProject {
    /// Run `stencil init guestbook` in a fresh temporary directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");

        let mut cmd = Command::cargo_bin("stencil").unwrap();
        cmd.current_dir(temp_dir.path())
            .env("STENCIL_CONFIG", &config_path)
            .env("NO_COLOR", "1")
            .args(["init", "guestbook"])
            .assert()
            .success();

        Self {
            app_dir: temp_dir.path().join("guestbook"),
            _temp_dir: temp_dir,
            config_path,
        }
    }

    /// The app root.
    pub fn app_dir(&self) -> &Path {
        &self.app_dir
    }

    /// The isolated global config path (may not exist).
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// A `stencil` command running inside the app.
    pub fn stencil(&self) -> Command {
        let mut cmd = Command::cargo_bin("stencil").unwrap();
        cmd.current_dir(&self.app_dir)
            .env("STENCIL_CONFIG", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write a file relative to the app root, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.app_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Read a file relative to the app root.
    pub fn read_file(&self, relative: &str) -> String {
        fs::read_to_string(self.app_dir.join(relative)).unwrap()
    }

    /// Parse a JSON document relative to the app root.
    pub fn read_json(&self, relative: &str) -> Value {
        serde_json::from_str(&self.read_file(relative)).unwrap()
    }

    /// Create the standard deployment component `web` (image nginx, port 80).
    pub fn create_web_deployment(&self) {
        self.stencil()
            .args([
                "prototype",
                "use",
                "single-port-deployment",
                "web",
                "--image=nginx",
                "--containerPort=80",
            ])
            .assert()
            .success();
    }
}
