//! Parameter schemas: type, requiredness, default, and literal quoting.
//!
//! A [`ParamSchema`] describes one named prototype parameter. Raw string
//! values (from flags or a values file) are rendered into JSON literal syntax
//! with [`ParamSchema::quote`] before they are handed to the renderer and
//! stored in a namespace document:
//!
//! | Type | Raw | Literal |
//! |---|---|---|
//! | `string` | `nginx` | `"nginx"` |
//! | `number` | `80` | `80` |
//! | `boolean` | `true` | `true` |
//! | `number-or-string` | `80` / `web` | `80` / `"web"` |
//! | `object` | `{"a":1}` | `{"a":1}` |
//! | `array` | `[1,2]` | `[1,2]` |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use crate::core::StencilError;

/// The declared type of a prototype parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParamType {
    /// Any text; always quoted
    String,
    /// A JSON number
    Number,
    /// `true` or `false`
    Boolean,
    /// A JSON object literal
    Object,
    /// A JSON array literal
    Array,
    /// A number when the raw value parses as one, a quoted string otherwise
    NumberOrString,
}

impl ParamType {
    /// Name used in prototype definitions and error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::NumberOrString => "number-or-string",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" | "bool" => Ok(Self::Boolean),
            "object" => Ok(Self::Object),
            "array" => Ok(Self::Array),
            "number-or-string" | "numberOrString" => Ok(Self::NumberOrString),
            other => Err(format!("unknown parameter type '{other}'")),
        }
    }
}

/// Schema for one named prototype parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSchema {
    /// Parameter name, unique within its prototype
    pub name: String,
    /// Declared type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Help text shown in flag help and `prototype describe`
    pub description: String,
    /// Raw, unquoted default; `None` makes the parameter required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ParamSchema {
    /// Create a required parameter.
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            default: None,
        }
    }

    /// Create an optional parameter with a raw default.
    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        default: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            default: Some(default.into()),
        }
    }

    /// True iff no default is recorded.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.default.is_none()
    }

    /// Render `raw` as a literal of this parameter's type.
    ///
    /// Strings are JSON-quoted with escaping. Other types are emitted verbatim
    /// when `raw` already parses as that type's literal.
    ///
    /// # Errors
    ///
    /// - [`StencilError::MissingParam`] when `raw` is empty and the parameter is required
    /// - [`StencilError::ParamTypeMismatch`] when `raw` is not a literal of the declared type
    pub fn quote(&self, raw: &str) -> Result<String, StencilError> {
        if raw.is_empty() && self.is_required() {
            return Err(StencilError::MissingParam {
                name: self.name.clone(),
            });
        }

        let literal = raw.trim();
        let parsed = serde_json::from_str::<Value>(literal).ok();
        let verbatim = match (self.param_type, parsed) {
            (ParamType::String, _) => return Ok(quote_string(raw)),
            (ParamType::NumberOrString, Some(Value::Number(_))) => true,
            (ParamType::NumberOrString, _) => return Ok(quote_string(raw)),
            (ParamType::Number, Some(Value::Number(_)))
            | (ParamType::Boolean, Some(Value::Bool(_)))
            | (ParamType::Object, Some(Value::Object(_)))
            | (ParamType::Array, Some(Value::Array(_))) => true,
            _ => false,
        };

        if verbatim {
            Ok(literal.to_string())
        } else {
            Err(StencilError::ParamTypeMismatch {
                name: self.name.clone(),
                expected: self.param_type.to_string(),
                value: raw.to_string(),
            })
        }
    }

    /// Like [`quote`](Self::quote), but an empty `raw` falls back to the default.
    ///
    /// # Errors
    ///
    /// Fails when `raw` is empty and the parameter is required, or when the
    /// value (or the default) does not match the declared type.
    pub fn quoted_value(&self, raw: &str) -> Result<String, StencilError> {
        if !raw.is_empty() {
            return self.quote(raw);
        }

        match &self.default {
            Some(default) => self.quote(default),
            None => Err(StencilError::MissingParam {
                name: self.name.clone(),
            }),
        }
    }
}

fn quote_string(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

/// An ordered list of parameter schemas belonging to one prototype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSchemas(pub Vec<ParamSchema>);

impl ParamSchemas {
    /// Parameters without a default.
    pub fn required(&self) -> impl Iterator<Item = &ParamSchema> {
        self.0.iter().filter(|p| p.is_required())
    }

    /// Parameters with a default.
    pub fn optional(&self) -> impl Iterator<Item = &ParamSchema> {
        self.0.iter().filter(|p| !p.is_required())
    }

    /// Look a parameter up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamSchema> {
        self.0.iter().find(|p| p.name == name)
    }

    /// Name of the first parameter declared twice, if any.
    #[must_use]
    pub fn first_duplicate(&self) -> Option<&str> {
        let mut seen = std::collections::HashSet::new();
        self.0.iter().map(|p| p.name.as_str()).find(|name| !seen.insert(*name))
    }

    /// One line per parameter, sorted by name, each prefixed with `indent`.
    ///
    /// ```text
    ///   --containerPort=<number>  Container port
    ///   --image=<string>          Container image
    /// ```
    #[must_use]
    pub fn pretty_string(&self, indent: &str) -> String {
        let mut params: Vec<&ParamSchema> = self.0.iter().collect();
        params.sort_by(|a, b| a.name.cmp(&b.name));

        let flags: Vec<String> =
            params.iter().map(|p| format!("--{}=<{}>", p.name, p.param_type)).collect();
        let width = flags.iter().map(String::len).max().unwrap_or(0);

        params
            .iter()
            .zip(&flags)
            .map(|(param, flag)| {
                if param.description.is_empty() {
                    format!("{indent}{flag}")
                } else {
                    format!("{indent}{flag:<width$}  {}", param.description)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Deref for ParamSchemas {
    type Target = [ParamSchema];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<ParamSchema>> for ParamSchemas {
    fn from(params: Vec<ParamSchema>) -> Self {
        Self(params)
    }
}

impl FromIterator<ParamSchema> for ParamSchemas {
    fn from_iter<I: IntoIterator<Item = ParamSchema>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
