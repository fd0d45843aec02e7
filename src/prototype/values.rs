//! Value Source Extractors and the Value Resolver.
//!
//! Parameter values for a prototype come from exactly one of two sources:
//!
//! - [`FileValues`] reads `key=value` lines from a values file
//! - [`FlagValues`] reads one bound flag per declared parameter
//!
//! [`resolve_values`] picks the source: a non-empty `--values-file` selects the
//! file and every per-parameter flag is ignored. The two sources are never merged.
//!
//! Both extractors apply the same rules to each declared parameter:
//!
//! - a non-empty value is quoted according to its type
//! - an empty value falls back to the parameter's default
//! - an empty value with no default is collected as missing
//!
//! Type mismatches fail immediately. Missing parameters are reported together,
//! sorted by name, in one [`StencilError::MissingRequiredParams`].

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::flags::BoundFlags;
use super::param::ParamSchemas;
use super::Prototype;
use crate::constants::OPTION_NAME;
use crate::core::{FileOperation, FileResultExt, StencilError};

/// Parameter name to quoted literal, ordered by name.
pub type QuotedValues = BTreeMap<String, String>;

/// One source of raw parameter values.
///
/// `extract` consumes the extractor; nothing is retained between invocations.
pub trait ValueExtractor {
    /// Produce the quoted value of every declared parameter.
    ///
    /// # Errors
    ///
    /// Returns the first type mismatch or input error, or one aggregated
    /// [`StencilError::MissingRequiredParams`].
    fn extract(self) -> Result<QuotedValues, StencilError>;
}

/// Extracts values from a `key=value` text stream.
///
/// Each non-blank line is split on its first `=`; key and value are trimmed.
/// A line with no `=` or an empty value is rejected. The `name` key is always
/// overwritten with the component name.
pub struct FileValues<'a, R> {
    proto: &'a Prototype,
    name: &'a str,
    reader: R,
}

impl<'a, R: BufRead> FileValues<'a, R> {
    /// Create an extractor reading from `reader`.
    pub const fn new(proto: &'a Prototype, name: &'a str, reader: R) -> Self {
        Self {
            proto,
            name,
            reader,
        }
    }

    fn raw_values(self) -> Result<BTreeMap<String, String>, StencilError> {
        let mut values = BTreeMap::new();

        for line in self.reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let invalid = || StencilError::InvalidValuesLine {
                line: line.clone(),
            };
            let (key, value) = line.split_once('=').ok_or_else(invalid)?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(invalid());
            }

            values.insert(key.to_string(), value.to_string());
        }

        Ok(values)
    }
}

impl<R: BufRead> ValueExtractor for FileValues<'_, R> {
    fn extract(self) -> Result<QuotedValues, StencilError> {
        let (proto, name) = (self.proto, self.name);
        if name.is_empty() {
            return Err(StencilError::MissingParam {
                name: OPTION_NAME.to_string(),
            });
        }

        let mut values = self.raw_values()?;
        values.insert(OPTION_NAME.to_string(), name.to_string());

        for key in values.keys() {
            if key != OPTION_NAME && proto.params.get(key).is_none() {
                tracing::warn!("Ignoring '{}': prototype {} has no such parameter", key, proto.name);
            }
        }

        quote_all(proto, |param| values.get(param).map(String::as_str))
    }
}

/// Extracts values from bound command-line flags.
pub struct FlagValues<'a> {
    proto: &'a Prototype,
    flags: &'a BoundFlags,
}

impl<'a> FlagValues<'a> {
    /// Create an extractor over already-parsed flags.
    pub const fn new(proto: &'a Prototype, flags: &'a BoundFlags) -> Self {
        Self {
            proto,
            flags,
        }
    }
}

impl ValueExtractor for FlagValues<'_> {
    fn extract(self) -> Result<QuotedValues, StencilError> {
        if let Some(duplicate) = self.proto.params.first_duplicate() {
            return Err(StencilError::DuplicateParam {
                prototype: self.proto.name.clone(),
                name: duplicate.to_string(),
            });
        }

        quote_all(self.proto, |param| self.flags.get(param))
    }
}

/// Quote every declared parameter, aggregating the missing ones.
fn quote_all<'v>(
    proto: &Prototype,
    lookup: impl Fn(&str) -> Option<&'v str>,
) -> Result<QuotedValues, StencilError> {
    let mut quoted = QuotedValues::new();
    let mut missing = Vec::new();

    for param in proto.params.iter() {
        let raw = lookup(&param.name).unwrap_or("");
        match param.quoted_value(raw) {
            Ok(literal) => {
                quoted.insert(param.name.clone(), literal);
            }
            Err(StencilError::MissingParam {
                ..
            }) => missing.push(param.clone()),
            Err(e) => return Err(e),
        }
    }

    if !missing.is_empty() {
        return Err(StencilError::MissingRequiredParams {
            prototype: proto.name.clone(),
            missing: ParamSchemas::from(missing).pretty_string("  "),
        });
    }

    Ok(quoted)
}

/// Resolve the quoted parameter values for `proto` from its bound flags.
///
/// A non-empty `--values-file` selects [`FileValues`] over that file, opened
/// relative to the current directory; otherwise [`FlagValues`] is used. The
/// `name` flag must already hold the component name.
///
/// # Errors
///
/// Returns an error if the values file cannot be opened, or the extractor's
/// error unchanged.
pub fn resolve_values(proto: &Prototype, flags: &BoundFlags) -> Result<QuotedValues> {
    match flags.values_file() {
        Some(path) => {
            tracing::debug!("Reading values for {} from {}", proto.name, path);
            let file = File::open(Path::new(path)).with_file_context(
                FileOperation::Open,
                path,
                "reading prototype values",
            )?;
            let name = flags.get_or_empty(OPTION_NAME);
            Ok(FileValues::new(proto, name, BufReader::new(file)).extract()?)
        }
        None => Ok(FlagValues::new(proto, flags).extract()?),
    }
}
