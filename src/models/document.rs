use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;

use crate::errors::AppError;
use crate::timefmt;

pub const CONTEXTS: [&str; 4] = ["admin", "timetable", "user_document", "general"];

pub fn valid_context(context: &str) -> bool {
    CONTEXTS.contains(&context)
}

/// Metadata row for one uploaded file. The blob itself lives in the blob
/// store under stored_name.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentMetadata {
    pub id: i64,
    pub original_file_name: String,
    pub stored_name: String,
    pub download_url: String,
    pub content_type: String,
    pub size: i64,
    pub context: String,
    pub uploaded_by: i64,
    pub uploaded_at: Option<String>,
}

pub struct NewDocument {
    pub original_file_name: String,
    pub stored_name: String,
    pub download_url: String,
    pub content_type: String,
    pub size: i64,
    pub context: String,
    pub uploaded_by: i64,
}

fn row_to_document(row: &Row) -> rusqlite::Result<DocumentMetadata> {
    let uploaded_at: Option<String> = row.get("uploaded_at")?;
    Ok(DocumentMetadata {
        id: row.get("id")?,
        original_file_name: row.get("original_file_name")?,
        stored_name: row.get("stored_name")?,
        download_url: row.get("download_url")?,
        content_type: row.get("content_type")?,
        size: row.get("size")?,
        context: row.get("context")?,
        uploaded_by: row.get("uploaded_by")?,
        uploaded_at: timefmt::normalize_opt(uploaded_at),
    })
}

const SELECT_DOCUMENT: &str =
    "SELECT id, original_file_name, stored_name, download_url, content_type, \
            size, context, uploaded_by, uploaded_at FROM documents";

pub fn record(conn: &Connection, new: &NewDocument) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO documents \
         (original_file_name, stored_name, download_url, content_type, size, context, uploaded_by) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            new.original_file_name,
            new.stored_name,
            new.download_url,
            new.content_type,
            new.size,
            new.context,
            new.uploaded_by,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Document metadata, newest first, optionally filtered by context.
pub fn list_by_context(
    conn: &Connection,
    context: Option<&str>,
) -> Result<Vec<DocumentMetadata>, AppError> {
    let items = match context {
        Some(ctx) => {
            let sql = format!(
                "{SELECT_DOCUMENT} WHERE context = ?1 ORDER BY uploaded_at DESC, id DESC"
            );
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map(params![ctx], row_to_document)?
                .collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let sql = format!("{SELECT_DOCUMENT} ORDER BY uploaded_at DESC, id DESC");
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map([], row_to_document)?
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(items)
}

pub fn get_by_id(conn: &Connection, id: i64) -> Result<DocumentMetadata, AppError> {
    let sql = format!("{SELECT_DOCUMENT} WHERE id = ?1");
    let doc = conn
        .query_row(&sql, params![id], row_to_document)
        .optional()?;
    doc.ok_or(AppError::NotFound)
}

pub fn delete(conn: &Connection, id: i64) -> Result<(), AppError> {
    let deleted = conn.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
