//! # Placeholder Extraction
//!
//! Scans a template's raw text for `{name}` tokens and turns each distinct
//! name into a `PlaceHolder` record. The type of every placeholder is guessed
//! from its name, and a human-readable label is derived for the fill-in form.
//!
//! Everything in this module is a pure function of its input.

use common::model::place_holder::{PlaceHolder, PlaceholderType};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid placeholder regex"));

static SECTION_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("valid section regex"));

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[^/.]+$").expect("valid extension regex"));

const IMAGE_HINTS: [&str; 3] = ["logo", "image", "photo"];
const DATE_HINTS: [&str; 2] = ["date", "time"];
const NUMBER_HINTS: [&str; 6] = ["id", "number", "amount", "count", "qty", "quantity"];

/// Extracts the distinct placeholders of `text` in order of first appearance.
///
/// A name seen twice keeps the position of its first occurrence. Names that
/// are empty after trimming are skipped: `{key}` substitution can never reach them.
pub fn extract_placeholders(text: &str) -> Vec<PlaceHolder> {
    let mut seen = HashSet::new();
    let mut placeholders = Vec::new();

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let name = caps[1].trim();
        if name.is_empty() || !seen.insert(name.to_string()) {
            continue;
        }

        placeholders.push(PlaceHolder {
            name: name.to_string(),
            placeholder_type: infer_type(name),
            label: format_label(name),
            required: true,
        });
    }

    placeholders
}

/// Guesses a placeholder's type from its name.
///
/// The checks are case-insensitive substring tests, applied in priority order:
/// image hints, then date hints, then number hints. Anything else is text.
pub fn infer_type(name: &str) -> PlaceholderType {
    let lower = name.to_lowercase();
    let has_any = |hints: &[&str]| hints.iter().any(|hint| lower.contains(hint));

    if has_any(&IMAGE_HINTS) {
        PlaceholderType::Image
    } else if has_any(&DATE_HINTS) {
        PlaceholderType::Date
    } else if has_any(&NUMBER_HINTS) {
        PlaceholderType::Number
    } else {
        PlaceholderType::Text
    }
}

pub fn is_image_name(name: &str) -> bool {
    infer_type(name) == PlaceholderType::Image
}

/// `account_name` -> `Account Name`.
pub fn format_label(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut label = String::with_capacity(spaced.len());
    let mut at_word_start = true;

    for ch in spaced.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            label.push(ch);
        } else if at_word_start {
            at_word_start = false;
            label.extend(ch.to_uppercase());
        } else {
            label.push(ch);
        }
    }

    label
}

/// Rough paragraph-gap count shown next to a template. Never less than one.
pub fn count_sections(text: &str) -> i64 {
    (SECTION_GAP_RE.find_iter(text).count() as i64).max(1)
}

/// `Invoice Template.docx` -> `Invoice Template`.
pub fn template_name_from_filename(filename: &str) -> String {
    EXTENSION_RE.replace(filename, "").into_owned()
}
