//! Read-only prototype actions: list, search, describe and preview.
//!
//! Each writes its report to the `out` it is run with, so the CLI passes
//! stdout and tests pass a buffer.

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use std::str::FromStr;

use super::{OPTION_ARGUMENTS, OPTION_FORMAT, OPTION_QUERY, OptionLoader, Options};
use crate::app::App;
use crate::config::GlobalConfig;
use crate::constants::OPTION_NAME;
use crate::core::StencilError;
use crate::prototype::{BoundFlags, Catalog, Prototype, SearchMode, TemplateType, resolve_values};
use crate::templating::{Renderer, TemplateRenderer};
use crate::utils::write_table;

/// Report format for list, search and describe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text columns
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = StencilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s, true).map_err(|_| StencilError::InvalidOption {
            name: OPTION_FORMAT.to_string(),
            reason: format!("unknown format '{s}' (expected table, json or yaml)"),
        })
    }
}

/// The app's catalog, loaded on demand unless one was supplied.
#[derive(Debug, Clone)]
struct CatalogSource {
    app: App,
    config: GlobalConfig,
    catalog: Option<Catalog>,
}

impl CatalogSource {
    fn from_loader(loader: &mut OptionLoader) -> Result<Self, StencilError> {
        Ok(Self {
            app: loader.app()?,
            config: loader.optional_config()?,
            catalog: None,
        })
    }

    fn load(&self) -> Result<Cow<'_, Catalog>> {
        match &self.catalog {
            Some(catalog) => Ok(Cow::Borrowed(catalog)),
            None => Ok(Cow::Owned(Catalog::for_app(&self.app, &self.config)?)),
        }
    }
}

fn load_format(loader: &mut OptionLoader) -> Result<OutputFormat, StencilError> {
    loader.optional_string(OPTION_FORMAT)?.map_or(Ok(OutputFormat::Table), |raw| raw.parse())
}

/// Summary row for listings.
#[derive(Debug, Serialize)]
struct PrototypeSummary<'a> {
    name: &'a str,
    description: &'a str,
}

fn write_summaries(out: &mut dyn Write, prototypes: &[&Prototype], format: OutputFormat) -> Result<()> {
    let rows: Vec<PrototypeSummary<'_>> = prototypes
        .iter()
        .map(|p| PrototypeSummary {
            name: &p.name,
            description: &p.short_description,
        })
        .collect();

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?,
        OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(&rows)?)?,
        OutputFormat::Table => {
            let table: Vec<[&str; 2]> = rows.iter().map(|r| [r.name, r.description]).collect();
            write_table(out, ["NAME", "DESCRIPTION"], &table)?;
        }
    }
    Ok(())
}

/// `prototype list`: every prototype in the catalog.
#[derive(Debug, Clone)]
pub struct PrototypeList {
    source: CatalogSource,
    format: OutputFormat,
}

impl PrototypeList {
    /// Build from `app`, optional `config` and optional `format`.
    ///
    /// # Errors
    ///
    /// Fails if an option is missing or mistyped.
    pub fn new(options: Options) -> Result<Self, StencilError> {
        let mut loader = options.loader();
        Ok(Self {
            source: CatalogSource::from_loader(&mut loader)?,
            format: load_format(&mut loader)?,
        })
    }

    /// Use `catalog` instead of loading one for the app.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.source.catalog = Some(catalog);
        self
    }

    /// Write the listing to `out`.
    ///
    /// # Errors
    ///
    /// Fails if the catalog cannot be loaded or `out` cannot be written.
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let catalog = self.source.load()?;
        let prototypes: Vec<&Prototype> = catalog.list().iter().collect();
        write_summaries(out, &prototypes, self.format)
    }
}

/// `prototype search`: prototypes whose names contain a query.
#[derive(Debug, Clone)]
pub struct PrototypeSearch {
    source: CatalogSource,
    query: String,
    format: OutputFormat,
}

impl PrototypeSearch {
    /// Build from `app`, `query`, optional `config` and optional `format`.
    ///
    /// # Errors
    ///
    /// Fails if an option is missing or mistyped.
    pub fn new(options: Options) -> Result<Self, StencilError> {
        let mut loader = options.loader();
        Ok(Self {
            source: CatalogSource::from_loader(&mut loader)?,
            query: loader.string(OPTION_QUERY)?,
            format: load_format(&mut loader)?,
        })
    }

    /// Use `catalog` instead of loading one for the app.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.source.catalog = Some(catalog);
        self
    }

    /// Write the matches to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`StencilError::PrototypeNotFound`] when nothing matches.
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let catalog = self.source.load()?;
        let found = catalog.search(&self.query, SearchMode::Substring);
        if found.is_empty() {
            return Err(StencilError::PrototypeNotFound {
                query: self.query.clone(),
                suggestions: Vec::new(),
            }
            .into());
        }
        write_summaries(out, &found, self.format)
    }
}

/// `prototype describe`: the full schema of one prototype.
#[derive(Debug, Clone)]
pub struct PrototypeDescribe {
    source: CatalogSource,
    query: String,
    format: OutputFormat,
}

impl PrototypeDescribe {
    /// Build from `app`, `query`, optional `config` and optional `format`.
    ///
    /// # Errors
    ///
    /// Fails if an option is missing or mistyped.
    pub fn new(options: Options) -> Result<Self, StencilError> {
        let mut loader = options.loader();
        Ok(Self {
            source: CatalogSource::from_loader(&mut loader)?,
            query: loader.string(OPTION_QUERY)?,
            format: load_format(&mut loader)?,
        })
    }

    /// Use `catalog` instead of loading one for the app.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.source.catalog = Some(catalog);
        self
    }

    /// Write the description to `out`.
    ///
    /// # Errors
    ///
    /// Fails if the query does not resolve to exactly one prototype.
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let catalog = self.source.load()?;
        let proto = catalog.find_unique(&self.query)?;

        match self.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(proto)?)?,
            OutputFormat::Yaml => write!(out, "{}", serde_yaml::to_string(proto)?)?,
            OutputFormat::Table => write_description(out, proto)?,
        }
        Ok(())
    }
}

fn write_description(out: &mut dyn Write, proto: &Prototype) -> Result<()> {
    writeln!(out, "PROTOTYPE NAME:\n{}\n", proto.name)?;
    writeln!(out, "DESCRIPTION:\n{}\n", proto.description)?;

    let required: Vec<_> = proto.params.required().cloned().collect();
    writeln!(out, "REQUIRED PARAMETERS:")?;
    writeln!(out, "{}\n", crate::prototype::ParamSchemas::from(required).pretty_string("  "))?;

    writeln!(out, "OPTIONAL PARAMETERS:")?;
    let mut optional: Vec<_> = proto.params.optional().collect();
    optional.sort_by(|a, b| a.name.cmp(&b.name));
    for param in optional {
        let default = param.default.as_deref().unwrap_or_default();
        writeln!(
            out,
            "  --{}=<{}>  {} [default: {:?}]",
            param.name, param.param_type, param.description, default
        )?;
    }

    writeln!(out, "\nTEMPLATE TYPE:\n  - {}", proto.template_type)?;
    Ok(())
}

/// `prototype preview`: render a prototype without writing a component.
///
/// Positionals are `<prototype> [templateType]`. The `component` template
/// variable is the `--name` flag, or the prototype's short name.
pub struct PrototypePreview {
    source: CatalogSource,
    args: Vec<String>,
    renderer: Box<dyn Renderer>,
}

impl std::fmt::Debug for PrototypePreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrototypePreview").field("args", &self.args).finish_non_exhaustive()
    }
}

impl PrototypePreview {
    /// Build from `app`, `arguments` and an optional `config`.
    ///
    /// # Errors
    ///
    /// Fails if an option is missing or mistyped.
    pub fn new(options: Options) -> Result<Self, StencilError> {
        let mut loader = options.loader();
        Ok(Self {
            source: CatalogSource::from_loader(&mut loader)?,
            args: loader.strings(OPTION_ARGUMENTS)?,
            renderer: Box::new(TemplateRenderer::new()),
        })
    }

    /// Use `catalog` instead of loading one for the app.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.source.catalog = Some(catalog);
        self
    }

    /// Replace the renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Render to `out`. Prints only help when `--help` is given.
    ///
    /// # Errors
    ///
    /// Fails if the prototype cannot be resolved, flags or values are invalid,
    /// or rendering fails.
    pub fn run(&self, out: &mut dyn Write) -> Result<()> {
        let Some(query) = self.args.first() else {
            return Err(StencilError::MissingArgument {
                name: "prototype".to_string(),
            }
            .into());
        };

        let catalog = self.source.load()?;
        let proto = catalog.find_unique(query)?;

        let Some(flags) = BoundFlags::parse(proto, "preview", &self.args)? else {
            return Ok(());
        };

        let template_type = match flags.positionals() {
            [] | [_] => proto.template_type,
            [_, template_type] => template_type.parse::<TemplateType>()?,
            _ => {
                return Err(StencilError::TooManyArguments {
                    usage: "takes a prototype name and an optional template type".to_string(),
                }
                .into());
            }
        };

        let component = match flags.get_or_empty(OPTION_NAME) {
            "" => proto.short_name(),
            name => name,
        };

        let params = resolve_values(proto, &flags)?;
        let text = self.renderer.render(proto, template_type, &params, component)?;

        write!(out, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(out)?;
        }
        Ok(())
    }
}
