//! Prototypes compiled into the binary.

use super::{Prototype, TemplateType, parse_prototype};
use crate::core::StencilError;

const BUILTINS: &[(&str, TemplateType, &str)] = &[
    (
        "single-port-deployment.jsonnet",
        TemplateType::Jsonnet,
        include_str!("system/single-port-deployment.jsonnet"),
    ),
    (
        "single-port-service.yaml",
        TemplateType::Yaml,
        include_str!("system/single-port-service.yaml"),
    ),
    ("configmap.json", TemplateType::Json, include_str!("system/configmap.json")),
];

/// Parse every built-in prototype.
///
/// # Errors
///
/// Only fails if an embedded definition is malformed.
pub fn system_prototypes() -> Result<Vec<Prototype>, StencilError> {
    BUILTINS
        .iter()
        .map(|(file, template_type, text)| {
            parse_prototype(&format!("builtin:{file}"), text, *template_type)
        })
        .collect()
}
