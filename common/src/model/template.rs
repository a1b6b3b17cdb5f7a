use crate::model::place_holder::PlaceHolder;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded document together with the placeholders detected in it.
///
/// `original_content` is the full plain text extracted from the upload and
/// `sections` is a display-only count of paragraph gaps in that text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub owner_id: Option<String>,
    pub name: String,
    pub filename: String,
    pub original_content: String,
    pub placeholders: Vec<PlaceHolder>,
    pub sections: i64,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload for a template; the id and upload time are assigned by storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub owner_id: Option<String>,
    pub name: String,
    pub filename: String,
    pub original_content: String,
    pub placeholders: Vec<PlaceHolder>,
    pub sections: i64,
}
