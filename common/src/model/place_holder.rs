use serde::{Deserialize, Serialize};

/// A `{name}` token found in a template's text.
///
/// `name` is the identity of a placeholder: it is trimmed and compared
/// case-sensitively. The remaining fields are derived from it when the
/// template is uploaded and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceHolder {
    pub name: String,
    #[serde(rename = "type")]
    pub placeholder_type: PlaceholderType,
    pub label: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceholderType {
    Text,
    Number,
    Date,
    Image,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_type_field_in_lowercase() {
        let ph = PlaceHolder {
            name: "company_logo".to_string(),
            placeholder_type: PlaceholderType::Image,
            label: "Company Logo".to_string(),
            required: true,
        };
        let json = serde_json::to_value(&ph).unwrap();
        assert_eq!(json["type"], "image");
        assert_eq!(json["label"], "Company Logo");
    }

    #[test]
    fn required_defaults_to_true() {
        let ph: PlaceHolder =
            serde_json::from_str(r#"{"name":"notes","type":"text","label":"Notes"}"#).unwrap();
        assert!(ph.required);
        assert_eq!(ph.placeholder_type, PlaceholderType::Text);
    }
}
