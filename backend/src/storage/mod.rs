//! # Persistence
//!
//! Templates and generation records sit behind the `Storage` trait so the HTTP
//! handlers can be served from SQLite in production and from an in-memory
//! database in tests. Generated PDF binaries live on disk in `PdfFiles`.

pub mod files;
pub mod sqlite;

pub use files::PdfFiles;
pub use sqlite::SqliteStorage;

use chrono::{DateTime, Utc};
use common::model::generated_pdf::{GeneratedPdf, NewGeneratedPdf};
use common::model::stats::DashboardStats;
use common::model::template::{NewTemplate, Template};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt JSON column: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupt timestamp {0:?}")]
    Timestamp(String),

    #[error("database lock poisoned")]
    Poisoned,
}

/// Repository of templates and generated-PDF records.
///
/// Ids are assigned by the implementation. Listings are newest first.
pub trait Storage: Send + Sync {
    fn create_template(&self, template: NewTemplate) -> Result<Template, StorageError>;
    fn get_template(&self, id: i64) -> Result<Option<Template>, StorageError>;
    fn list_templates(&self) -> Result<Vec<Template>, StorageError>;
    /// Case-insensitive substring match on name or filename.
    fn search_templates(&self, query: &str) -> Result<Vec<Template>, StorageError>;
    /// Returns `false` when no such template exists. Generated PDFs that
    /// reference the template are kept.
    fn delete_template(&self, id: i64) -> Result<bool, StorageError>;

    fn create_generated_pdf(&self, pdf: NewGeneratedPdf) -> Result<GeneratedPdf, StorageError>;
    fn get_generated_pdf(&self, id: i64) -> Result<Option<GeneratedPdf>, StorageError>;
    fn list_generated_pdfs(&self) -> Result<Vec<GeneratedPdf>, StorageError>;
    fn list_generated_pdfs_by_template(
        &self,
        template_id: i64,
    ) -> Result<Vec<GeneratedPdf>, StorageError>;
    fn delete_generated_pdf(&self, id: i64) -> Result<bool, StorageError>;

    fn dashboard_stats(&self, now: DateTime<Utc>) -> Result<DashboardStats, StorageError> {
        let templates = self.list_templates()?;
        let pdfs = self.list_generated_pdfs()?;
        Ok(summarize(&templates, &pdfs, now))
    }
}

/// Builds dashboard figures from newest-first listings.
pub fn summarize(
    templates: &[Template],
    pdfs: &[GeneratedPdf],
    now: DateTime<Utc>,
) -> DashboardStats {
    // Usage per template in first-seen order, so ties go to the template
    // with the most recent generation.
    let mut usage: Vec<(i64, u64)> = Vec::new();
    for pdf in pdfs {
        match usage.iter_mut().find(|(id, _)| *id == pdf.template_id) {
            Some((_, count)) => *count += 1,
            None => usage.push((pdf.template_id, 1)),
        }
    }

    let mut most_used_template = None;
    let mut max_usage = 0;
    for (template_id, count) in usage {
        if count > max_usage {
            max_usage = count;
            // A deleted winner still raises the bar but has no name to show.
            if let Some(template) = templates.iter().find(|t| t.id == template_id) {
                most_used_template = Some(template.name.clone());
            }
        }
    }

    let recent_activity = templates.first().map(|latest| {
        let hours = (now - latest.uploaded_at).num_hours();
        if hours < 1 {
            "Less than an hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    });

    DashboardStats {
        total_templates: templates.len() as u64,
        total_generated_pdfs: pdfs.len() as u64,
        recent_activity,
        most_used_template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use common::model::form_value::FormData;

    fn template(id: i64, name: &str, uploaded_at: DateTime<Utc>) -> Template {
        Template {
            id,
            owner_id: None,
            name: name.to_string(),
            filename: format!("{}.docx", name),
            original_content: String::new(),
            placeholders: Vec::new(),
            sections: 1,
            uploaded_at,
        }
    }

    fn pdf(id: i64, template_id: i64) -> GeneratedPdf {
        GeneratedPdf {
            id,
            owner_id: None,
            template_id,
            name: format!("pdf {}", id),
            form_data: FormData::new(),
            pdf_content: None,
            pdf_url: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_store_has_no_activity() {
        let stats = summarize(&[], &[], Utc::now());
        assert_eq!(stats, DashboardStats::default());
    }

    #[test]
    fn picks_most_used_template_and_breaks_ties_by_recency() {
        let now = Utc::now();
        let templates = vec![template(2, "Letter", now), template(1, "Invoice", now)];
        // Newest first: template 2 was used most recently.
        let pdfs = vec![pdf(4, 2), pdf(3, 1), pdf(2, 2), pdf(1, 1)];
        let stats = summarize(&templates, &pdfs, now);
        assert_eq!(stats.total_templates, 2);
        assert_eq!(stats.total_generated_pdfs, 4);
        assert_eq!(stats.most_used_template.as_deref(), Some("Letter"));

        let pdfs = vec![pdf(3, 2), pdf(2, 1), pdf(1, 1)];
        let stats = summarize(&templates, &pdfs, now);
        assert_eq!(stats.most_used_template.as_deref(), Some("Invoice"));
    }

    #[test]
    fn deleted_winner_leaves_earlier_name() {
        let now = Utc::now();
        let templates = vec![template(1, "Invoice", now)];
        let pdfs = vec![pdf(3, 1), pdf(2, 9), pdf(1, 9)];
        let stats = summarize(&templates, &pdfs, now);
        assert_eq!(stats.most_used_template.as_deref(), Some("Invoice"));

        let pdfs = vec![pdf(1, 9)];
        assert_eq!(summarize(&templates, &pdfs, now).most_used_template, None);
    }

    #[test]
    fn describes_recent_activity_in_whole_hours() {
        let now = Utc::now();
        let fresh = vec![template(1, "a", now - Duration::minutes(59))];
        assert_eq!(
            summarize(&fresh, &[], now).recent_activity.as_deref(),
            Some("Less than an hour ago")
        );

        let old = vec![template(1, "a", now - Duration::minutes(150))];
        assert_eq!(
            summarize(&old, &[], now).recent_activity.as_deref(),
            Some("2 hours ago")
        );
    }
}
