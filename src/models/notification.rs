use rusqlite::{Connection, params};
use serde::Serialize;

use crate::errors::AppError;
use crate::timefmt;

pub const TYPE_FORM_DELETION: &str = "form_deletion";

/// Admin listing defaults to the 50 most recent events.
pub const DEFAULT_RECENT_LIMIT: i64 = 50;

/// Append-only admin-facing event record.
#[derive(Debug, Clone, Serialize)]
pub struct AdminNotification {
    pub id: i64,
    #[serde(rename = "type")]
    pub ntype: String,
    pub message: String,
    pub actor_id: i64,
    pub actor_email: Option<String>,
    pub related_submission_id: Option<i64>,
    pub related_kind: Option<String>,
    pub is_read: bool,
    pub created_at: Option<String>,
}

pub struct NewNotification {
    pub ntype: String,
    pub message: String,
    pub actor_id: i64,
    pub actor_email: Option<String>,
    pub related_submission_id: Option<i64>,
    pub related_kind: Option<String>,
}

pub fn append(conn: &Connection, event: &NewNotification) -> Result<i64, AppError> {
    conn.execute(
        "INSERT INTO notifications \
         (ntype, message, actor_id, actor_email, related_submission_id, related_kind) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            event.ntype,
            event.message,
            event.actor_id,
            event.actor_email,
            event.related_submission_id,
            event.related_kind,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent events first, capped at `limit`.
pub fn list_recent(conn: &Connection, limit: i64) -> Result<Vec<AdminNotification>, AppError> {
    let mut stmt = conn.prepare(
        "SELECT id, ntype, message, actor_id, actor_email, related_submission_id, \
                related_kind, is_read, created_at \
         FROM notifications \
         ORDER BY created_at DESC, id DESC \
         LIMIT ?1",
    )?;
    let items = stmt
        .query_map(params![limit.max(1)], |row| {
            let created_at: Option<String> = row.get(8)?;
            Ok(AdminNotification {
                id: row.get(0)?,
                ntype: row.get(1)?,
                message: row.get(2)?,
                actor_id: row.get(3)?,
                actor_email: row.get(4)?,
                related_submission_id: row.get(5)?,
                related_kind: row.get(6)?,
                is_read: row.get(7)?,
                created_at: timefmt::normalize_opt(created_at),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}
