//! Binding a prototype's parameter schema to a command-line flag surface.
//!
//! Each prototype gets its own flag set, built at run time from its schema:
//!
//! - `--values-file <FILE>` (reserved)
//! - `--name <NAME>` (reserved; shared with a declared `name` parameter)
//! - one `--<param> <VALUE>` per declared parameter
//! - free positional arguments (`<prototype> <component> [templateType]`)
//!
//! Flags carry no clap defaults. Defaults are applied by the extractors so an
//! omitted flag and an empty flag behave the same way.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Arg, ArgAction, Command};
use std::collections::BTreeMap;

use super::Prototype;
use crate::constants::{OPTION_NAME, OPTION_VALUES_FILE};
use crate::core::StencilError;

/// Id of the positional argument list.
const ARGS_ID: &str = "args";

/// Names a prototype may not declare because the flag surface owns them.
const RESERVED: &[&str] = &[OPTION_VALUES_FILE, "help", ARGS_ID];

/// Build the flag set for `proto`.
///
/// # Errors
///
/// - [`StencilError::DuplicateParam`] if two parameters share a name
/// - [`StencilError::ReservedParam`] if a parameter collides with a reserved flag
pub fn bind_flags(proto: &Prototype, command_name: &str) -> Result<Command, StencilError> {
    if let Some(duplicate) = proto.params.first_duplicate() {
        return Err(StencilError::DuplicateParam {
            prototype: proto.name.clone(),
            name: duplicate.to_string(),
        });
    }
    if let Some(reserved) = proto.params.iter().find(|p| RESERVED.contains(&p.name.as_str())) {
        return Err(StencilError::ReservedParam {
            prototype: proto.name.clone(),
            name: reserved.name.clone(),
        });
    }

    let mut command = Command::new(command_name.to_string())
        .no_binary_name(true)
        .about(proto.short_description.clone())
        .override_usage(format!("{command_name} <prototype> <component> [templateType] [FLAGS]"))
        .arg(
            Arg::new(OPTION_VALUES_FILE)
                .long(OPTION_VALUES_FILE)
                .value_name("FILE")
                .help("Read parameter values from a key=value file (parameter flags are ignored)"),
        );

    if proto.params.get(OPTION_NAME).is_none() {
        command = command.arg(
            Arg::new(OPTION_NAME)
                .long(OPTION_NAME)
                .value_name("NAME")
                .allow_hyphen_values(true)
                .help("Name of the component"),
        );
    }

    for param in proto.params.iter() {
        let help = match &param.default {
            Some(default) => format!("{} [default: {default:?}]", param.description),
            None => format!("{} (required)", param.description),
        };
        command = command.arg(
            Arg::new(param.name.clone())
                .long(param.name.clone())
                .value_name(param.param_type.as_str().to_uppercase())
                .allow_hyphen_values(true)
                .help(help.trim_start().to_string()),
        );
    }

    Ok(command.arg(
        Arg::new(ARGS_ID).action(ArgAction::Append).num_args(0..).value_name("ARGS").hide(true),
    ))
}

/// Flag values and positionals parsed for one prototype invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundFlags {
    values: BTreeMap<String, String>,
    positionals: Vec<String>,
}

impl BoundFlags {
    /// Bind `proto`'s flags and parse `args`.
    ///
    /// Returns `Ok(None)` when `--help` was requested; the help text has
    /// already been printed.
    ///
    /// # Errors
    ///
    /// Fails on schema configuration errors and on unknown or malformed flags.
    pub fn parse(proto: &Prototype, command_name: &str, args: &[String]) -> Result<Option<Self>> {
        let command = bind_flags(proto, command_name)?;

        let matches = match command.try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.print()?;
                return Ok(None);
            }
            Err(e) => {
                return Err(anyhow::anyhow!("{}", e.to_string().trim_end())
                    .context(format!("invalid flags for prototype '{}'", proto.name)));
            }
        };

        let mut values = BTreeMap::new();
        let mut names: Vec<&str> = proto.params.iter().map(|p| p.name.as_str()).collect();
        names.extend([OPTION_VALUES_FILE, OPTION_NAME]);
        for name in names {
            if let Some(value) = matches.get_one::<String>(name) {
                values.insert(name.to_string(), value.clone());
            }
        }

        let positionals =
            matches.get_many::<String>(ARGS_ID).map(|vals| vals.cloned().collect()).unwrap_or_default();

        tracing::debug!("Bound {} flag values for {}", values.len(), proto.name);
        Ok(Some(Self {
            values,
            positionals,
        }))
    }

    /// Build directly from values, bypassing command-line parsing.
    pub fn from_values<I, K, V>(values: I, positionals: Vec<String>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            positionals,
        }
    }

    /// The raw value of a flag, if it was given.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// The raw value of a flag, or `""` when it was not given.
    #[must_use]
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Overwrite a flag value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The non-empty `--values-file` path, if one was given.
    #[must_use]
    pub fn values_file(&self) -> Option<&str> {
        self.get(OPTION_VALUES_FILE).filter(|path| !path.is_empty())
    }

    /// Positional arguments in order.
    #[must_use]
    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }
}
