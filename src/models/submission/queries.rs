use rusqlite::{Connection, OptionalExtension, Row, params};

use super::types::*;
use crate::errors::AppError;
use crate::timefmt;

fn row_to_submission(row: &Row) -> rusqlite::Result<Submission> {
    let kind_str: String = row.get("kind")?;
    let payload_json: String = row.get("payload")?;
    let submitted_at: Option<String> = row.get("submitted_at")?;

    Ok(Submission {
        id: row.get("id")?,
        // Unknown kind strings cannot be inserted past the CHECK constraint;
        // fall back to CustomForm rather than failing the whole listing.
        kind: SubmissionKind::parse(&kind_str).unwrap_or(SubmissionKind::CustomForm),
        owner_id: row.get("owner_id")?,
        owner_email: row
            .get::<_, Option<String>>("owner_email")?
            .filter(|e| !e.trim().is_empty()),
        status: row.get("status")?,
        submitted_at: timefmt::normalize_opt(submitted_at),
        payload: serde_json::from_str(&payload_json).unwrap_or(serde_json::Value::Null),
    })
}

const SELECT_SUBMISSION: &str = "SELECT id, kind, owner_id, owner_email, status, \
                                        submitted_at, payload FROM submissions";

/// Persist a new submission with a server-assigned timestamp and the default
/// status. A (kind, owner) uniqueness hit reports AlreadySubmitted so a
/// concurrent double-submit fails loudly instead of duplicating.
pub fn create(
    conn: &Connection,
    kind: SubmissionKind,
    owner_id: i64,
    owner_email: Option<&str>,
    payload_json: &str,
) -> Result<i64, AppError> {
    let result = conn.execute(
        "INSERT INTO submissions (kind, owner_id, owner_email, payload, status) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![kind.as_str(), owner_id, owner_email, payload_json, STATUS_SUBMITTED],
    );
    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(e) if e.to_string().contains("UNIQUE") => Err(AppError::AlreadySubmitted),
        Err(e) => Err(e.into()),
    }
}

/// All submissions of one kind by one owner, newest first.
pub fn list_by_owner(
    conn: &Connection,
    kind: SubmissionKind,
    owner_id: i64,
) -> Result<Vec<Submission>, AppError> {
    let sql = format!(
        "{SELECT_SUBMISSION} WHERE kind = ?1 AND owner_id = ?2 \
         ORDER BY submitted_at DESC, id DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map(params![kind.as_str(), owner_id], row_to_submission)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

/// All submissions across every kind, newest first; timestamp ties keep
/// arrival order.
pub fn list_all(conn: &Connection) -> Result<Vec<Submission>, AppError> {
    let sql = format!("{SELECT_SUBMISSION} ORDER BY submitted_at DESC, id ASC");
    let mut stmt = conn.prepare(&sql)?;
    let items = stmt
        .query_map([], row_to_submission)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub fn get_by_id(conn: &Connection, kind: SubmissionKind, id: i64) -> Result<Submission, AppError> {
    let sql = format!("{SELECT_SUBMISSION} WHERE kind = ?1 AND id = ?2");
    let submission = conn
        .query_row(&sql, params![kind.as_str(), id], row_to_submission)
        .optional()?;
    submission.ok_or(AppError::NotFound)
}

/// Hard delete. NotFound when no row of that kind and id exists.
pub fn delete_by_id(conn: &Connection, kind: SubmissionKind, id: i64) -> Result<(), AppError> {
    let deleted = conn.execute(
        "DELETE FROM submissions WHERE kind = ?1 AND id = ?2",
        params![kind.as_str(), id],
    )?;
    if deleted == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}
