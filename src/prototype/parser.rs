//! Prototype definition parser.
//!
//! A prototype file starts with a block of comment lines (`//` or `#`) whose
//! `@` directives describe the prototype. The first line that is not a comment
//! starts the body, which is kept verbatim.
//!
//! ```text
//! // @apiVersion 0.1.0
//! // @name io.stencil.pkg.configmap
//! // @description A ConfigMap holding a single key
//! // @shortDescription Single-key ConfigMap
//! // @param name string Name of the ConfigMap
//! // @optionalParam key string data Key to store the value under
//! // @optionalParam value string "hello world" The value
//! {"apiVersion": "v1", ...}
//! ```
//!
//! `@optionalParam` takes a default token after the type. Wrap it in double
//! quotes to include whitespace; the quotes are not part of the default.

use crate::core::StencilError;

use super::param::{ParamSchema, ParamType};
use super::{ParamSchemas, Prototype, TemplateType};

/// Parse a prototype definition.
///
/// `origin` names the definition in errors (usually its file path).
///
/// # Errors
///
/// Returns [`StencilError::PrototypeParse`] for malformed or unknown directives
/// and missing `@name`/`@apiVersion`, and [`StencilError::DuplicateParam`] when
/// two parameters share a name.
pub fn parse_prototype(
    origin: &str,
    text: &str,
    template_type: TemplateType,
) -> Result<Prototype, StencilError> {
    let fail = |reason: String| StencilError::PrototypeParse {
        file: origin.to_string(),
        reason,
    };

    let mut name = None;
    let mut api_version = None;
    let mut description = String::new();
    let mut short_description = String::new();
    let mut params = Vec::new();

    let mut body_start = text.len();
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let comment = trimmed.strip_prefix("//").or_else(|| trimmed.strip_prefix('#'));

        match comment {
            Some(comment) => {
                if let Some(directive) = comment.trim_start().strip_prefix('@') {
                    let (keyword, rest) = split_word(directive);
                    match keyword {
                        "apiVersion" => {
                            let version = semver::Version::parse(rest.trim()).map_err(|e| {
                                fail(format!("invalid @apiVersion '{}': {e}", rest.trim()))
                            })?;
                            api_version = Some(version);
                        }
                        "name" => name = Some(rest.trim().to_string()),
                        "description" => description = rest.trim().to_string(),
                        "shortDescription" => short_description = rest.trim().to_string(),
                        "param" => params.push(parse_param(rest, false).map_err(&fail)?),
                        "optionalParam" => params.push(parse_param(rest, true).map_err(&fail)?),
                        other => return Err(fail(format!("unknown directive '@{other}'"))),
                    }
                }
            }
            None if trimmed.is_empty() => {}
            None => {
                body_start = offset;
                break;
            }
        }
        offset += line.len();
    }

    let name = match name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(fail("missing @name".to_string())),
    };
    let api_version = api_version.ok_or_else(|| fail("missing @apiVersion".to_string()))?;

    let params = ParamSchemas::from(params);
    if let Some(duplicate) = params.first_duplicate() {
        return Err(StencilError::DuplicateParam {
            prototype: name,
            name: duplicate.to_string(),
        });
    }

    if short_description.is_empty() {
        short_description = description.clone();
    }

    Ok(Prototype {
        name,
        api_version,
        description,
        short_description,
        params,
        template_type,
        body: text[body_start..].to_string(),
        origin: origin.to_string(),
    })
}

/// `@param name type description...` or `@optionalParam name type default description...`
fn parse_param(rest: &str, optional: bool) -> Result<ParamSchema, String> {
    let directive = if optional { "@optionalParam" } else { "@param" };

    let (name, rest) = split_word(rest.trim_start());
    let (type_name, rest) = split_word(rest.trim_start());
    if name.is_empty() || type_name.is_empty() {
        return Err(format!("{directive} requires a name and a type"));
    }
    let param_type: ParamType = type_name.parse()?;

    let (default, rest) = if optional {
        let (default, rest) = split_default(rest.trim_start())?;
        (Some(default), rest)
    } else {
        (None, rest)
    };

    Ok(ParamSchema {
        name: name.to_string(),
        param_type,
        description: rest.trim().to_string(),
        default,
    })
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(pos) => (&s[..pos], &s[pos..]),
        None => (s, ""),
    }
}

/// Split the default token off an `@optionalParam` remainder.
fn split_default(s: &str) -> Result<(String, &str), String> {
    if !s.starts_with('"') {
        let (token, rest) = split_word(s);
        if token.is_empty() {
            return Err("@optionalParam requires a default value".to_string());
        }
        return Ok((token.to_string(), rest));
    }

    let mut escaped = false;
    for (pos, c) in s.char_indices().skip(1) {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                let quoted = &s[..=pos];
                let default: String = serde_json::from_str(quoted)
                    .map_err(|e| format!("invalid quoted default {quoted}: {e}"))?;
                return Ok((default, &s[pos + 1..]));
            }
            _ => escaped = false,
        }
    }
    Err(format!("unterminated quoted default in {s:?}"))
}
