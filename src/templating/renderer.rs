//! Tera-backed prototype renderer.

use tera::{Context as TeraContext, Tera};

use crate::core::StencilError;
use crate::prototype::{Prototype, QuotedValues, TemplateType};

/// Renders a prototype body with its quoted parameter values.
///
/// This is the seam between parameter resolution and the template language;
/// actions hold it as a trait object so tests can substitute a fake.
pub trait Renderer {
    /// Render `proto` as `template_type` for the component `component`.
    ///
    /// # Errors
    ///
    /// Fails if the prototype has no body of that type, the template does not
    /// render, or the output is not a valid document of that type.
    fn render(
        &self,
        proto: &Prototype,
        template_type: TemplateType,
        params: &QuotedValues,
        component: &str,
    ) -> Result<String, StencilError>;
}

/// The default renderer.
///
/// The template context holds two variables:
///
/// - `params`: parameter name to literal text (`{{ params.image }}` renders `"nginx"`)
/// - `component`: the component's leaf name, unquoted
///
/// Autoescaping is off; literals are inserted exactly as quoted.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// Create a renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Format a Tera error chain without Tera's internal template names.
    #[must_use]
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut messages = vec![error.to_string()];
        let mut current: Option<&dyn Error> = error.source();
        while let Some(err) = current {
            messages.push(err.to_string());
            current = err.source();
        }

        let cleaned: Vec<String> = messages
            .into_iter()
            .map(|msg| {
                msg.replace("while rendering '__tera_one_off'", "")
                    .replace("Failed to render '__tera_one_off'", "")
                    .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                    .replace("'__tera_one_off'", "template")
                    .trim()
                    .to_string()
            })
            .filter(|msg| !msg.is_empty())
            .collect();

        if cleaned.is_empty() {
            "template rendering failed".to_string()
        } else {
            cleaned.join(": ")
        }
    }

    fn validate(proto: &Prototype, template_type: TemplateType, text: &str) -> Result<(), StencilError> {
        let invalid = |reason: String| StencilError::TemplateRender {
            prototype: proto.name.clone(),
            reason: format!("rendered output is not valid {template_type}: {reason}"),
        };

        match template_type {
            TemplateType::Json => serde_json::from_str::<serde_json::Value>(text)
                .map(drop)
                .map_err(|e| invalid(e.to_string())),
            TemplateType::Yaml => serde_yaml::from_str::<serde_yaml::Value>(text)
                .map(drop)
                .map_err(|e| invalid(e.to_string())),
            TemplateType::Jsonnet => Ok(()),
        }
    }
}

impl Renderer for TemplateRenderer {
    fn render(
        &self,
        proto: &Prototype,
        template_type: TemplateType,
        params: &QuotedValues,
        component: &str,
    ) -> Result<String, StencilError> {
        if template_type != proto.template_type {
            return Err(StencilError::TemplateUnavailable {
                prototype: proto.name.clone(),
                template_type: template_type.to_string(),
            });
        }

        let mut context = TeraContext::new();
        context.insert("params", params);
        context.insert("component", component);

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        tracing::debug!("Rendering {} as {} for {}", proto.name, template_type, component);
        let rendered = tera.render_str(&proto.body, &context).map_err(|e| {
            StencilError::TemplateRender {
                prototype: proto.name.clone(),
                reason: Self::format_tera_error(&e),
            }
        })?;

        Self::validate(proto, template_type, &rendered)?;
        Ok(rendered)
    }
}
