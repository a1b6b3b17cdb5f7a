use crate::model::form_value::FormData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Record of one PDF generation: the values used, the substituted text and
/// where the binary was stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPdf {
    pub id: i64,
    pub owner_id: Option<String>,
    pub template_id: i64,
    pub name: String,
    pub form_data: FormData,
    pub pdf_content: Option<String>,
    pub pdf_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGeneratedPdf {
    pub owner_id: Option<String>,
    pub template_id: i64,
    pub name: String,
    pub form_data: FormData,
    pub pdf_content: Option<String>,
    pub pdf_url: Option<String>,
}
