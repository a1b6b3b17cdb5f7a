//! Request and response payloads of the `/api` endpoints.

use crate::model::place_holder::PlaceHolder;
use crate::model::template::Template;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/preview` and `POST /api/generate-pdf-download`.
///
/// `form_data` stays untyped here; the server validates it against the
/// template's placeholders before anything is substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRequest {
    pub template_id: i64,
    #[serde(default)]
    pub form_data: serde_json::Value,
}

/// Body of `POST /api/generate-pdf`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratePdfRequest {
    pub template_id: i64,
    #[serde(default)]
    pub form_data: serde_json::Value,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub content: String,
    pub placeholders: Vec<PlaceHolder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub template: Template,
    pub placeholders_detected: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}
