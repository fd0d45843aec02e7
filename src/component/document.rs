//! Locating and overwriting values inside a parameter document by dotted path.
//!
//! Rules for [`set_path`]:
//!
//! - every segment but the last must already exist
//! - the last segment may create a new key on an object
//! - a numeric segment addresses an array element
//! - when the walk meets an array and the next segment is not numeric,
//!   [`ParamOptions::index`] selects the element (which must be an object)
//! - when the final value is an array, [`ParamOptions::index`] selects the
//!   element to replace
//! - an index that was never used is an error

use serde_json::Value;

use crate::core::StencilError;

/// Options for a path mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParamOptions {
    /// Array element to select or replace
    pub index: Option<usize>,
}

/// Split a dotted path into segments.
///
/// # Errors
///
/// Returns [`StencilError::InvalidPath`] for an empty path or an empty segment.
pub fn parse_path(raw: &str) -> Result<Vec<String>, StencilError> {
    let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
    if raw.is_empty() || segments.iter().any(String::is_empty) {
        return Err(StencilError::InvalidPath {
            path: raw.to_string(),
        });
    }
    Ok(segments)
}

/// Set the value at `path` inside `root`.
///
/// # Errors
///
/// Returns a resolution error ([`StencilError::PathNotFound`],
/// [`StencilError::IndexOutOfRange`], [`StencilError::IndexRequired`],
/// [`StencilError::NotAContainer`], [`StencilError::UnusedIndex`]) and leaves
/// `root` unchanged.
pub fn set_path(
    root: &mut Value,
    path: &[String],
    value: Value,
    options: &ParamOptions,
) -> Result<(), StencilError> {
    let dotted = path.join(".");
    let Some((last, parents)) = path.split_last() else {
        return Err(StencilError::InvalidPath {
            path: dotted,
        });
    };

    let mut index = options.index;
    let mut current = root;
    for segment in parents {
        current = descend(current, segment, &mut index, &dotted)?;
    }
    assign(current, last, value, index, &dotted)
}

fn descend<'a>(
    current: &'a mut Value,
    segment: &str,
    index: &mut Option<usize>,
    dotted: &str,
) -> Result<&'a mut Value, StencilError> {
    let not_found = || StencilError::PathNotFound {
        path: dotted.to_string(),
        segment: segment.to_string(),
    };

    match current {
        Value::Object(map) => map.get_mut(segment).ok_or_else(not_found),
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(position) => element(items, position, dotted),
            Err(_) => {
                let position = index.take().ok_or_else(|| StencilError::IndexRequired {
                    path: dotted.to_string(),
                })?;
                match element(items, position, dotted)? {
                    Value::Object(map) => map.get_mut(segment).ok_or_else(not_found),
                    _ => Err(StencilError::NotAContainer {
                        path: dotted.to_string(),
                    }),
                }
            }
        },
        _ => Err(StencilError::NotAContainer {
            path: dotted.to_string(),
        }),
    }
}

/// Write `value` under `key`. `index` is whatever the walk left unused.
fn assign(
    current: &mut Value,
    key: &str,
    value: Value,
    index: Option<usize>,
    dotted: &str,
) -> Result<(), StencilError> {
    let unused = |index| StencilError::UnusedIndex {
        path: dotted.to_string(),
        index,
    };

    match current {
        Value::Object(map) => match (index, map.get_mut(key)) {
            (Some(position), Some(Value::Array(items))) => {
                *element(items, position, dotted)? = value;
                Ok(())
            }
            (Some(position), _) => Err(unused(position)),
            (None, _) => {
                map.insert(key.to_string(), value);
                Ok(())
            }
        },
        Value::Array(items) => match (key.parse::<usize>(), index) {
            (Ok(_), Some(position)) => Err(unused(position)),
            (Ok(position), None) => {
                *element(items, position, dotted)? = value;
                Ok(())
            }
            (Err(_), None) => Err(StencilError::IndexRequired {
                path: dotted.to_string(),
            }),
            (Err(_), Some(position)) => match element(items, position, dotted)? {
                Value::Object(map) => {
                    map.insert(key.to_string(), value);
                    Ok(())
                }
                _ => Err(StencilError::NotAContainer {
                    path: dotted.to_string(),
                }),
            },
        },
        _ => Err(StencilError::NotAContainer {
            path: dotted.to_string(),
        }),
    }
}

fn element<'a>(
    items: &'a mut [Value],
    position: usize,
    dotted: &str,
) -> Result<&'a mut Value, StencilError> {
    let len = items.len();
    items.get_mut(position).ok_or_else(|| StencilError::IndexOutOfRange {
        path: dotted.to_string(),
        index: position,
        len,
    })
}
