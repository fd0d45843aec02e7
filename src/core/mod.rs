//! Core types and error handling for Stencil
//!
//! - [`error`] - [`StencilError`], [`ErrorContext`] and [`user_friendly_error`]
//! - [`file_error`] - file operation errors that remember what was being done and why

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, StencilError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
