//! Placeholder substitution.
//!
//! Replaces `{key}` tokens with form values. Keys whose name looks like an
//! image are swapped for an `[IMAGE:key]` marker instead; the renderer later
//! resolves the marker against the raw form values.

use crate::document::extract::is_image_name;
use common::model::form_value::FormData;
use regex::{Captures, RegexBuilder};
use thiserror::Error;

/// Compiled size allowed for the combined key pattern.
const PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

#[derive(Debug, Error)]
pub enum SubstituteError {
    #[error("placeholder keys do not fit in one pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Marker left in the text for an image placeholder.
pub fn image_marker(key: &str) -> String {
    format!("[IMAGE:{}]", key)
}

/// Substitutes every `{key}` of `values` in `text`.
///
/// All keys are matched in one left-to-right pass, so a replacement that
/// happens to contain another `{key}` is never substituted again. Tokens whose
/// key is absent from `values` are left untouched.
pub fn substitute(text: &str, values: &FormData) -> Result<String, SubstituteError> {
    substitute_with_size_limit(text, values, PATTERN_SIZE_LIMIT)
}

fn substitute_with_size_limit(
    text: &str,
    values: &FormData,
    size_limit: usize,
) -> Result<String, SubstituteError> {
    if values.is_empty() {
        return Ok(text.to_string());
    }

    // Longest first so that a key never loses to a shorter key sharing its prefix.
    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let pattern = keys
        .iter()
        .map(|key| regex::escape(&format!("{{{}}}", key)))
        .collect::<Vec<_>>()
        .join("|");

    // Every alternative is an escaped literal; only the compiled size limit can fail.
    let re = RegexBuilder::new(&pattern).size_limit(size_limit).build()?;

    Ok(re
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            let key = &token[1..token.len() - 1];
            replacement_for(key, values)
        })
        .into_owned())
}

fn replacement_for(key: &str, values: &FormData) -> String {
    if is_image_name(key) {
        return image_marker(key);
    }
    match values.get(key) {
        Some(value) if !value.is_blank() => value.as_str().to_string(),
        _ => format!("[{}]", key),
    }
}
