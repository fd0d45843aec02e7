//! `init`: create an app skeleton.

use anyhow::{Context, Result};
use std::path::Path;

use crate::app::App;
use crate::constants::DEFAULT_ENVIRONMENT;
use crate::env;

/// Create the app `name` in `dir` with one environment, `default`, whose
/// namespace is also `default`.
///
/// # Errors
///
/// Fails if `dir` already holds an app or a file cannot be written.
pub fn init_app(dir: &Path, name: &str) -> Result<App> {
    let mut app = App::init(dir, name).with_context(|| format!("initialize app '{name}'"))?;
    env::add(&mut app, DEFAULT_ENVIRONMENT, DEFAULT_ENVIRONMENT)?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_app_layout() {
        let temp = TempDir::new().unwrap();
        let app = init_app(temp.path(), "guestbook").unwrap();

        assert_eq!(app.name(), "guestbook");
        assert!(temp.path().join("app.toml").is_file());
        assert!(temp.path().join("components").is_dir());
        assert!(env::params_path(&app, "default").is_file());
        assert_eq!(app.environment("default").unwrap().namespace, "default");

        let reloaded = App::load(temp.path()).unwrap();
        assert_eq!(reloaded.environments().len(), 1);
    }

    #[test]
    fn test_init_app_twice_fails() {
        let temp = TempDir::new().unwrap();
        init_app(temp.path(), "guestbook").unwrap();
        let err = init_app(temp.path(), "guestbook").unwrap_err();
        assert!(err.to_string().contains("initialize app 'guestbook'"));
    }
}
