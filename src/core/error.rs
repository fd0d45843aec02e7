//! Error handling for Stencil
//!
//! This module provides the typed error enum used across the crate and the
//! user-facing error reporting used by the CLI. Two principles drive it:
//! 1. **Strongly-typed errors** so callers and tests can match on the failure class
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Configuration**: problems in prototype definitions or option combinations,
//!   detected before any input is read ([`StencilError::DuplicateParam`],
//!   [`StencilError::ConflictingScope`], [`StencilError::MissingOption`], ...)
//! - **Input validation**: bad user input, aggregated where possible
//!   ([`StencilError::MissingRequiredParams`], [`StencilError::InvalidValuesLine`], ...)
//! - **Resolution**: something named by the user could not be found
//!   ([`StencilError::ComponentNotFound`], [`StencilError::PathNotFound`], ...)
//! - **Decode**: a `param set` value could not be decoded ([`StencilError::InvalidValue`])
//!
//! Orchestration code wraps these in [`anyhow::Error`] with the stage that failed.
//! The typed root cause stays reachable through `downcast_ref::<StencilError>()`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use stencil_cli::core::{StencilError, user_friendly_error};
//!
//! let error = StencilError::PrototypeNotFound {
//!     query: "deploymnt".to_string(),
//!     suggestions: vec!["io.stencil.pkg.single-port-deployment".to_string()],
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for Stencil operations.
#[derive(Error, Debug)]
pub enum StencilError {
    /// A prototype declares the same parameter name twice.
    ///
    /// This is a configuration error in the prototype definition, not a user
    /// input error, and is reported before any flag or values file is read.
    #[error("prototype '{prototype}' has multiple parameters with name '{name}'")]
    DuplicateParam {
        /// Prototype that declares the duplicate
        prototype: String,
        /// The duplicated parameter name
        name: String,
    },

    /// A prototype declares a parameter that collides with a reserved flag.
    #[error("prototype '{prototype}' declares reserved parameter '{name}'")]
    ReservedParam {
        /// Prototype that declares the parameter
        prototype: String,
        /// The reserved name
        name: String,
    },

    /// Two prototypes in the catalog share a name.
    #[error("prototype '{name}' is defined more than once")]
    DuplicatePrototype {
        /// The duplicated prototype name
        name: String,
    },

    /// A prototype definition could not be parsed.
    #[error("invalid prototype definition in {file}: {reason}")]
    PrototypeParse {
        /// File (or built-in identifier) holding the definition
        file: String,
        /// Why parsing failed
        reason: String,
    },

    /// `param set` was asked to target an environment and the global namespace at once.
    #[error("unable to set global param for environments")]
    ConflictingScope,

    /// An option combination is not valid for the chosen scope.
    #[error("invalid option '{name}': {reason}")]
    InvalidOption {
        /// The option key
        name: String,
        /// Why the option was rejected
        reason: String,
    },

    /// A required option was missing from an action's option bag.
    #[error("required option '{name}' is missing")]
    MissingOption {
        /// The option key
        name: String,
    },

    /// A line in a values file is not a `key=value` pair.
    #[error("{line:?} is invalid. value format is key=value")]
    InvalidValuesLine {
        /// The raw text of the offending line
        line: String,
    },

    /// One or more required parameters have no value.
    ///
    /// `missing` is pre-rendered, one parameter per line, sorted by name.
    #[error(
        "failed to instantiate prototype '{prototype}'. The following required parameters are missing:\n{missing}"
    )]
    MissingRequiredParams {
        /// The prototype being instantiated
        prototype: String,
        /// Rendered list of the missing parameters
        missing: String,
    },

    /// A single parameter has no value and no default.
    #[error("parameter '{name}' is required")]
    MissingParam {
        /// The parameter name
        name: String,
    },

    /// A raw value does not parse as the declared parameter type.
    #[error("could not convert parameter '{name}' to {expected}: {value:?}")]
    ParamTypeMismatch {
        /// The parameter name
        name: String,
        /// The declared type
        expected: String,
        /// The offending raw value
        value: String,
    },

    /// A user-supplied `param set` value could not be decoded.
    #[error("unable to decode value {value:?}: {reason}")]
    InvalidValue {
        /// The raw value
        value: String,
        /// Why decoding failed
        reason: String,
    },

    /// No prototype matched a query.
    #[error("no prototype names matched '{query}'")]
    PrototypeNotFound {
        /// The user query
        query: String,
        /// Closest prototype names, best first
        suggestions: Vec<String>,
    },

    /// More than one prototype matched a query.
    #[error("ambiguous match for '{query}': {}", .matches.join(", "))]
    AmbiguousPrototype {
        /// The user query
        query: String,
        /// Every matching prototype name
        matches: Vec<String>,
    },

    /// A command argument was not supplied.
    #[error("command is missing argument '{name}'")]
    MissingArgument {
        /// The argument name
        name: String,
    },

    /// Too many positional arguments were supplied.
    #[error("command has too many arguments ({usage})")]
    TooManyArguments {
        /// What the command accepts
        usage: String,
    },

    /// An unknown template type was requested.
    #[error("unknown template type '{name}' (expected jsonnet, json or yaml)")]
    InvalidTemplateType {
        /// The requested template type
        name: String,
    },

    /// The prototype has no body for the requested template type.
    #[error("prototype '{prototype}' does not provide a {template_type} template")]
    TemplateUnavailable {
        /// The prototype name
        prototype: String,
        /// The requested template type
        template_type: String,
    },

    /// Rendering a prototype body failed.
    #[error("failed to render prototype '{prototype}': {reason}")]
    TemplateRender {
        /// The prototype name
        prototype: String,
        /// Why rendering failed
        reason: String,
    },

    /// No `app.toml` could be located.
    #[error("app.toml not found in {path} or any parent directory")]
    AppNotFound {
        /// Where the search started
        path: String,
    },

    /// `app.toml` could not be parsed.
    #[error("invalid app metadata in {file}: {reason}")]
    AppParse {
        /// Path to app.toml
        file: String,
        /// Parser message
        reason: String,
    },

    /// The named environment is not defined by the app.
    #[error("environment '{name}' does not exist")]
    EnvironmentNotFound {
        /// The environment name
        name: String,
    },

    /// An environment with this name already exists.
    #[error("environment '{name}' already exists")]
    EnvironmentExists {
        /// The environment name
        name: String,
    },

    /// The named component does not exist.
    #[error("component '{name}' does not exist")]
    ComponentNotFound {
        /// The component query
        name: String,
    },

    /// A component with this name already exists.
    #[error("component '{name}' already exists at {path}")]
    ComponentExists {
        /// The component name
        name: String,
        /// Where the existing component lives
        path: String,
    },

    /// The named namespace (module) does not exist.
    #[error("namespace '{name}' does not exist")]
    NamespaceNotFound {
        /// The namespace name
        name: String,
    },

    /// A dotted path was empty or had an empty segment.
    #[error("invalid parameter path {path:?}")]
    InvalidPath {
        /// The raw path
        path: String,
    },

    /// An intermediate path segment does not exist in the document.
    #[error("path segment '{segment}' not found at '{path}'")]
    PathNotFound {
        /// The dotted path walked so far
        path: String,
        /// The missing segment
        segment: String,
    },

    /// A path walked through a value that cannot contain children.
    #[error("'{path}' is not an object or array")]
    NotAContainer {
        /// The dotted path to the scalar
        path: String,
    },

    /// An array index is out of range.
    #[error("index {index} is out of range for '{path}' (length {len})")]
    IndexOutOfRange {
        /// The dotted path to the array
        path: String,
        /// The requested index
        index: usize,
        /// The array length
        len: usize,
    },

    /// A path reached an array but no index was given.
    #[error("'{path}' is an array; an index is required")]
    IndexRequired {
        /// The dotted path to the array
        path: String,
    },

    /// An index was given but the path never reached an array.
    #[error("index {index} was given but '{path}' is not an array")]
    UnusedIndex {
        /// The dotted path
        path: String,
        /// The unused index
        index: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StencilError {
    /// True for errors caused by prototype definitions or option combinations
    /// rather than by user-supplied values.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateParam { .. }
                | Self::ReservedParam { .. }
                | Self::DuplicatePrototype { .. }
                | Self::PrototypeParse { .. }
                | Self::ConflictingScope
                | Self::InvalidOption { .. }
                | Self::MissingOption { .. }
        )
    }

    /// True for errors raised while looking something up.
    #[must_use]
    pub const fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Self::ComponentNotFound { .. }
                | Self::NamespaceNotFound { .. }
                | Self::EnvironmentNotFound { .. }
                | Self::PathNotFound { .. }
                | Self::NotAContainer { .. }
                | Self::IndexOutOfRange { .. }
                | Self::IndexRequired { .. }
                | Self::UnusedIndex { .. }
        )
    }
}

/// Error context wrapper that provides user-friendly error information.
///
/// When displayed, errors show:
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: anyhow::Error,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors.
    ///
    /// The full context chain is printed, outermost stage first, so the user
    /// sees both which stage failed and the root cause.
    pub fn display(&self) {
        eprintln!("{}: {:#}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`StencilError`] anywhere in the context chain and IO errors;
/// everything else is shown verbatim. A [`FileOperationError`](super::FileOperationError)
/// in the chain contributes its explanation as details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let suggestion = error.chain().find_map(|cause| {
        cause.downcast_ref::<StencilError>().and_then(suggestion_for).or_else(|| {
            cause.downcast_ref::<std::io::Error>().and_then(|io_error| match io_error.kind() {
                std::io::ErrorKind::PermissionDenied => {
                    Some("Check file ownership and permissions".to_string())
                }
                std::io::ErrorKind::NotFound => {
                    Some("Check that the file or directory exists and the path is correct".to_string())
                }
                _ => None,
            })
        })
    });

    let details = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<super::FileOperationError>())
        .map(super::FileOperationError::user_message);

    let mut ctx = ErrorContext::new(error);
    if let Some(details) = details {
        ctx = ctx.with_details(details);
    }
    if let Some(suggestion) = suggestion {
        ctx = ctx.with_suggestion(suggestion);
    }
    ctx
}

fn suggestion_for(error: &StencilError) -> Option<String> {
    match error {
        StencilError::PrototypeNotFound {
            suggestions,
            ..
        } if !suggestions.is_empty() => Some(format!("Did you mean: {}?", suggestions.join(", "))),
        StencilError::PrototypeNotFound {
            ..
        } => Some("Run 'stencil prototype list' to see available prototypes".to_string()),
        StencilError::AmbiguousPrototype {
            ..
        } => Some("Use a longer or fully qualified prototype name".to_string()),
        StencilError::MissingRequiredParams {
            ..
        } => Some("Pass each missing parameter as a flag or add it to a --values-file".to_string()),
        StencilError::AppNotFound {
            ..
        } => Some("Run 'stencil init <name>' to create an app, or pass --app-dir".to_string()),
        StencilError::EnvironmentNotFound {
            ..
        } => Some("Run 'stencil env list' to see defined environments".to_string()),
        StencilError::ConflictingScope => {
            Some("Use either --env or --global, not both".to_string())
        }
        StencilError::IndexRequired {
            ..
        } => Some("Pass --index to choose an array element".to_string()),
        StencilError::InvalidValue {
            ..
        } => Some("Quote strings that look like JSON, e.g. '\"[not a list\"'".to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_error_display() {
        let error = StencilError::InvalidValuesLine {
            line: "novalue".to_string(),
        };
        assert_eq!(error.to_string(), "\"novalue\" is invalid. value format is key=value");

        let error = StencilError::AmbiguousPrototype {
            query: "deploy".to_string(),
            matches: vec!["a.deploy".to_string(), "b.deploy".to_string()],
        };
        assert_eq!(error.to_string(), "ambiguous match for 'deploy': a.deploy, b.deploy");

        assert_eq!(
            StencilError::ConflictingScope.to_string(),
            "unable to set global param for environments"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let error: StencilError = std::io::Error::other("disk gone").into();
        assert!(matches!(error, StencilError::IoError(_)));
        assert_eq!(error.to_string(), "IO error: disk gone");
    }

    #[test]
    fn test_error_classification() {
        assert!(StencilError::ConflictingScope.is_configuration_error());
        assert!(
            StencilError::DuplicateParam {
                prototype: "p".to_string(),
                name: "x".to_string(),
            }
            .is_configuration_error()
        );

        let lookup = StencilError::PathNotFound {
            path: "spec".to_string(),
            segment: "nope".to_string(),
        };
        assert!(lookup.is_resolution_error());
        assert!(!lookup.is_configuration_error());

        let decode = StencilError::InvalidValue {
            value: "[".to_string(),
            reason: "eof".to_string(),
        };
        assert!(!decode.is_resolution_error());
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(StencilError::ConflictingScope)
            .with_details("both --env and --global were set")
            .with_suggestion("pick one");

        let display = ctx.to_string();
        assert!(display.contains("unable to set global param for environments"));
        assert!(display.contains("Details: both --env and --global were set"));
        assert!(display.contains("Suggestion: pick one"));
    }

    #[test]
    fn test_user_friendly_error_finds_wrapped_cause() {
        let error: anyhow::Error = Err::<(), _>(StencilError::AppNotFound {
            path: "/tmp".to_string(),
        })
        .context("load app")
        .unwrap_err();

        let ctx = user_friendly_error(error);
        assert!(ctx.suggestion.unwrap().contains("stencil init"));
    }

    #[test]
    fn test_user_friendly_error_not_found_suggestions() {
        let ctx = user_friendly_error(
            StencilError::PrototypeNotFound {
                query: "deploymnt".to_string(),
                suggestions: vec!["deployment".to_string()],
            }
            .into(),
        );
        assert_eq!(ctx.suggestion.as_deref(), Some("Did you mean: deployment?"));
    }

    #[test]
    fn test_user_friendly_error_generic() {
        let ctx = user_friendly_error(anyhow::anyhow!("something went wrong"));
        assert!(ctx.suggestion.is_none());
        assert_eq!(ctx.to_string(), "something went wrong");
    }
}
