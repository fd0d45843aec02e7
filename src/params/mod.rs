//! Decoding raw `param set` values.
//!
//! A value typed on the command line is decoded into a [`DecodedValue`] before
//! it is stored. Decoding decides whether the stored literal needs quotes:
//!
//! | Raw | Decoded | Stored literal |
//! |---|---|---|
//! | `3` | number | `3` |
//! | `true` | boolean | `true` |
//! | `null` | null | `null` |
//! | `foo` | string | `"foo"` |
//! | `"3"` | string | `"3"` |
//! | `[1, 2]` | structured | `[1,2]` |
//!
//! Text that starts like a JSON array, object or string but does not parse is
//! a decode error rather than a plain string.

use serde_json::{Number, Value};

use crate::core::StencilError;

/// A `param set` value after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    /// Plain text
    String(String),
    /// A JSON number
    Number(Number),
    /// `true` or `false`
    Boolean(bool),
    /// `null`
    Null,
    /// An array or object literal
    Structured(Value),
}

impl DecodedValue {
    /// The literal to store: quoted for strings, compact JSON otherwise.
    #[must_use]
    pub fn literal(&self) -> String {
        self.to_json().to_string()
    }

    /// The value as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::String(s) => Value::String(s.clone()),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Null => Value::Null,
            Self::Structured(v) => v.clone(),
        }
    }
}

/// Decode a raw command-line value.
///
/// # Errors
///
/// Returns [`StencilError::InvalidValue`] for blank input and for text that
/// starts with `[`, `{` or `"` but is not valid JSON.
pub fn decode_value(raw: &str) -> Result<DecodedValue, StencilError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StencilError::InvalidValue {
            value: raw.to_string(),
            reason: "value is empty".to_string(),
        });
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => Ok(DecodedValue::String(s)),
        Ok(Value::Number(n)) => Ok(DecodedValue::Number(n)),
        Ok(Value::Bool(b)) => Ok(DecodedValue::Boolean(b)),
        Ok(Value::Null) => Ok(DecodedValue::Null),
        Ok(structured) => Ok(DecodedValue::Structured(structured)),
        Err(e) if trimmed.starts_with(['[', '{', '"']) => Err(StencilError::InvalidValue {
            value: raw.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(DecodedValue::String(raw.to_string())),
    }
}
