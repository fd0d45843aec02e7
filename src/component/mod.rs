//! Components, namespaces and their parameter documents.
//!
//! - [`document`] - the path-addressed parameter store (`set_path`)
//! - [`namespace`] - namespaces, components and `params.json` on disk
//! - [`manager`] - the [`ComponentManager`] seam and its filesystem implementation

pub mod document;
pub mod manager;
pub mod namespace;

pub use document::{ParamOptions, parse_path, set_path};
pub use manager::{ComponentManager, FsManager, split_component_name};
pub use namespace::{Component, Namespace, NamespaceParams};
