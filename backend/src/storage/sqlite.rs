//! SQLite-backed `Storage`.
//!
//! One connection guarded by a mutex. Placeholders and form data are stored
//! as JSON text, timestamps as fixed-width RFC 3339 strings so that they sort
//! lexicographically.

use super::{Storage, StorageError};
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use common::model::generated_pdf::{GeneratedPdf, NewGeneratedPdf};
use common::model::template::{NewTemplate, Template};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS templates (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id         TEXT,
    name             TEXT NOT NULL,
    filename         TEXT NOT NULL,
    original_content TEXT NOT NULL,
    placeholders     TEXT NOT NULL,
    sections         INTEGER NOT NULL,
    uploaded_at      TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS generated_pdfs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    owner_id    TEXT,
    template_id INTEGER NOT NULL,
    name        TEXT NOT NULL,
    form_data   TEXT NOT NULL,
    pdf_content TEXT,
    pdf_url     TEXT,
    created_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS generated_pdfs_template ON generated_pdfs (template_id);
";

const TEMPLATE_COLUMNS: &str =
    "id, owner_id, name, filename, original_content, placeholders, sections, uploaded_at";
const PDF_COLUMNS: &str =
    "id, owner_id, template_id, name, form_data, pdf_content, pdf_url, created_at";

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn query_pdfs(
        &self,
        filter: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<GeneratedPdf>, StorageError> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM generated_pdfs {} ORDER BY created_at DESC, id DESC",
            PDF_COLUMNS, filter
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, PdfRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(PdfRow::into_model).collect()
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StorageError::Timestamp(raw.to_string()))
}

/// Column values as stored, before the JSON and timestamp columns are decoded.
struct TemplateRow {
    id: i64,
    owner_id: Option<String>,
    name: String,
    filename: String,
    original_content: String,
    placeholders: String,
    sections: i64,
    uploaded_at: String,
}

impl TemplateRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            filename: row.get(3)?,
            original_content: row.get(4)?,
            placeholders: row.get(5)?,
            sections: row.get(6)?,
            uploaded_at: row.get(7)?,
        })
    }

    fn into_model(self) -> Result<Template, StorageError> {
        Ok(Template {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name,
            filename: self.filename,
            original_content: self.original_content,
            placeholders: serde_json::from_str(&self.placeholders)?,
            sections: self.sections,
            uploaded_at: parse_timestamp(&self.uploaded_at)?,
        })
    }
}

struct PdfRow {
    id: i64,
    owner_id: Option<String>,
    template_id: i64,
    name: String,
    form_data: String,
    pdf_content: Option<String>,
    pdf_url: Option<String>,
    created_at: String,
}

impl PdfRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            template_id: row.get(2)?,
            name: row.get(3)?,
            form_data: row.get(4)?,
            pdf_content: row.get(5)?,
            pdf_url: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_model(self) -> Result<GeneratedPdf, StorageError> {
        Ok(GeneratedPdf {
            id: self.id,
            owner_id: self.owner_id,
            template_id: self.template_id,
            name: self.name,
            form_data: serde_json::from_str(&self.form_data)?,
            pdf_content: self.pdf_content,
            pdf_url: self.pdf_url,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl Storage for SqliteStorage {
    fn create_template(&self, template: NewTemplate) -> Result<Template, StorageError> {
        let uploaded_at = Utc::now().trunc_subsecs(6);
        let placeholders = serde_json::to_string(&template.placeholders)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO templates
                 (owner_id, name, filename, original_content, placeholders, sections, uploaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                template.owner_id,
                template.name,
                template.filename,
                template.original_content,
                placeholders,
                template.sections,
                timestamp(uploaded_at),
            ],
        )?;

        Ok(Template {
            id: conn.last_insert_rowid(),
            owner_id: template.owner_id,
            name: template.name,
            filename: template.filename,
            original_content: template.original_content,
            placeholders: template.placeholders,
            sections: template.sections,
            uploaded_at,
        })
    }

    fn get_template(&self, id: i64) -> Result<Option<Template>, StorageError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM templates WHERE id = ?1", TEMPLATE_COLUMNS),
                params![id],
                TemplateRow::from_row,
            )
            .optional()?;
        row.map(TemplateRow::into_model).transpose()
    }

    fn list_templates(&self) -> Result<Vec<Template>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM templates ORDER BY uploaded_at DESC, id DESC",
            TEMPLATE_COLUMNS
        ))?;
        let rows = stmt
            .query_map([], TemplateRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(TemplateRow::into_model).collect()
    }

    fn search_templates(&self, query: &str) -> Result<Vec<Template>, StorageError> {
        // SQLite's lower() only folds ASCII, so match in Rust.
        let needle = query.to_lowercase();
        Ok(self
            .list_templates()?
            .into_iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.filename.to_lowercase().contains(&needle)
            })
            .collect())
    }

    fn delete_template(&self, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    fn create_generated_pdf(&self, pdf: NewGeneratedPdf) -> Result<GeneratedPdf, StorageError> {
        let created_at = Utc::now().trunc_subsecs(6);
        let form_data = serde_json::to_string(&pdf.form_data)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO generated_pdfs
                 (owner_id, template_id, name, form_data, pdf_content, pdf_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                pdf.owner_id,
                pdf.template_id,
                pdf.name,
                form_data,
                pdf.pdf_content,
                pdf.pdf_url,
                timestamp(created_at),
            ],
        )?;

        Ok(GeneratedPdf {
            id: conn.last_insert_rowid(),
            owner_id: pdf.owner_id,
            template_id: pdf.template_id,
            name: pdf.name,
            form_data: pdf.form_data,
            pdf_content: pdf.pdf_content,
            pdf_url: pdf.pdf_url,
            created_at,
        })
    }

    fn get_generated_pdf(&self, id: i64) -> Result<Option<GeneratedPdf>, StorageError> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM generated_pdfs WHERE id = ?1", PDF_COLUMNS),
                params![id],
                PdfRow::from_row,
            )
            .optional()?;
        row.map(PdfRow::into_model).transpose()
    }

    fn list_generated_pdfs(&self) -> Result<Vec<GeneratedPdf>, StorageError> {
        self.query_pdfs("", params![])
    }

    fn list_generated_pdfs_by_template(
        &self,
        template_id: i64,
    ) -> Result<Vec<GeneratedPdf>, StorageError> {
        self.query_pdfs("WHERE template_id = ?1", params![template_id])
    }

    fn delete_generated_pdf(&self, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM generated_pdfs WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }
}
