use crate::model::place_holder::PlaceholderType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Form values keyed by placeholder name.
pub type FormData = BTreeMap<String, FormValue>;

/// A validated form value, tagged with the type of the placeholder it fills.
///
/// Every variant carries the value's string form. An empty string stands for a
/// value the user left blank (or sent as `null`, `false` or `0`), which the
/// substitution step renders as a bracketed `[name]` marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FormValue {
    Text(String),
    Number(String),
    Date(String),
    /// A `data:image/...;base64,...` URI.
    Image(String),
}

impl FormValue {
    pub fn new(kind: PlaceholderType, value: impl Into<String>) -> Self {
        let value = value.into();
        match kind {
            PlaceholderType::Text => FormValue::Text(value),
            PlaceholderType::Number => FormValue::Number(value),
            PlaceholderType::Date => FormValue::Date(value),
            PlaceholderType::Image => FormValue::Image(value),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormValue::Text(v) | FormValue::Number(v) | FormValue::Date(v) | FormValue::Image(v) => v,
        }
    }

    pub fn kind(&self) -> PlaceholderType {
        match self {
            FormValue::Text(_) => PlaceholderType::Text,
            FormValue::Number(_) => PlaceholderType::Number,
            FormValue::Date(_) => PlaceholderType::Date,
            FormValue::Image(_) => PlaceholderType::Image,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_str().is_empty()
    }
}
