//! Integration test suite for Stencil
//!
//! End-to-end tests that drive the real `stencil` binary against apps in
//! temporary directories.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **init**: app skeleton creation
//! - **prototype**: list, search, describe and preview
//! - **prototype_use**: component creation from prototypes
//! - **param_set**: component, namespace and environment parameters
//! - **env**: environment listing and creation
//! - **error_scenarios**: error reporting and exit codes

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod env;
mod error_scenarios;
mod init;
mod param_set;
mod prototype;
mod prototype_use;
