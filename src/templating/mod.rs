//! Rendering prototype bodies into component text.
//!
//! Prototype bodies are [Tera](https://keats.github.io/tera/) templates. The
//! renderer receives already-quoted literals, so templates insert parameters
//! directly with `{{ params.<name> }}` and never add quotes of their own.

pub mod renderer;

pub use renderer::{Renderer, TemplateRenderer};
