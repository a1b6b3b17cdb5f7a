use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_templates: u64,
    pub total_generated_pdfs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_activity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_used_template: Option<String>,
}
