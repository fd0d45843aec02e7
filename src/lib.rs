//! Stencil - generate application components from parameterized prototypes
//!
//! A prototype is a Jsonnet, JSON or YAML template whose header declares typed
//! parameters. Stencil binds those parameters to command-line flags (or a
//! `key=value` values file), quotes each value as a JSON literal, renders the
//! template, and records the result as a component of an app. Parameters can
//! later be changed per component, per namespace, or per environment.
//!
//! # Architecture Overview
//!
//! An app is a directory holding `app.toml`:
//!
//! ```text
//! guestbook/
//! ├── app.toml                         # name, environments, prototype libraries
//! ├── components/
//! │   ├── params.json                  # root namespace: global + per-component params
//! │   ├── web.jsonnet                  # rendered component
//! │   └── backend/params.json          # nested namespace
//! ├── environments/default/params.json # flat per-environment overrides
//! └── prototypes/                      # app prototype library
//! ```
//!
//! # Core Modules
//!
//! - [`prototype`] - parameter schemas, prototype parsing, the catalog, flag
//!   binding and value resolution
//! - [`templating`] - the Tera-backed renderer
//! - [`component`] - namespaces, components and the path-addressed parameter store
//! - [`env`] - environment override tables
//! - [`params`] - decoding of `param set` values
//! - [`actions`] - the operations behind each command
//! - [`app`] - `app.toml` and app discovery
//! - [`config`] - global user configuration
//! - [`cli`] - the `stencil` command tree
//! - [`core`] - error types and user-facing error reporting
//! - [`utils`] - atomic file writes, JSON documents and tables
//!
//! # Example
//!
//! ```bash
//! stencil init guestbook && cd guestbook
//! stencil prototype use single-port-deployment web --image=nginx --containerPort=80
//! stencil param set web replicas 3
//! stencil env add prod --namespace guestbook-prod
//! stencil param set web replicas 5 --env prod
//! ```

pub mod actions;
pub mod app;
pub mod cli;
pub mod component;
pub mod config;
pub mod constants;
pub mod core;
pub mod env;
pub mod params;
pub mod prototype;
pub mod templating;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
