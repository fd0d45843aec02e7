//! Configuration management.
//!
//! - [`global`] - the per-user config (`~/.stencil/config.toml`) listing shared
//!   prototype libraries
//! - [`parser`] - TOML parsing with file path context
//!
//! Per-app metadata (`app.toml`) lives in [`crate::app`].

pub mod global;
pub mod parser;

pub use global::GlobalConfig;
pub use parser::parse_config;
