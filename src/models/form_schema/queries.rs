use rusqlite::{Connection, OptionalExtension, params};

use super::types::*;
use crate::errors::AppError;
use crate::models::submission::SubmissionKind;
use crate::timefmt;

/// Load the schema for a kind, falling back to the kind's defaults when no
/// row is persisted. Never fails with not-found.
pub fn get_schema(conn: &Connection, kind: SubmissionKind) -> Result<FormSchema, AppError> {
    let row = conn
        .query_row(
            "SELECT title, description, is_active, fields, updated_at \
             FROM form_schemas WHERE form_id = ?1",
            params![kind.schema_id()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, bool>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((title, description, is_active, fields_json, updated_at)) = row else {
        return Ok(defaults(kind));
    };

    // Tolerate a malformed fields column rather than failing every consumer.
    let fields: Vec<FormField> = serde_json::from_str(&fields_json).unwrap_or_else(|e| {
        log::warn!("Malformed fields JSON for {}: {e}", kind.schema_id());
        Vec::new()
    });

    Ok(FormSchema {
        form_id: kind.schema_id().to_string(),
        title,
        description,
        is_active,
        fields,
        updated_at: timefmt::normalize_opt(updated_at),
    })
}

/// Full upsert of a kind's schema. Structural validation happens here;
/// the stored row gets a fresh updated_at stamp.
pub fn put_schema(
    conn: &Connection,
    kind: SubmissionKind,
    input: &SchemaInput,
) -> Result<(), AppError> {
    let errors = validate_input(kind, input);
    if !errors.is_empty() {
        return Err(AppError::InvalidPayload(errors));
    }

    let fields_json = serde_json::to_string(&input.fields)
        .map_err(|e| AppError::invalid(format!("Fields are not serializable: {e}")))?;

    conn.execute(
        "INSERT INTO form_schemas (form_id, title, description, is_active, fields, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, strftime('%Y-%m-%dT%H:%M:%S', 'now')) \
         ON CONFLICT(form_id) DO UPDATE SET \
             title = excluded.title, \
             description = excluded.description, \
             is_active = excluded.is_active, \
             fields = excluded.fields, \
             updated_at = excluded.updated_at",
        params![
            kind.schema_id(),
            input.title.trim(),
            input.description.trim(),
            input.is_active,
            fields_json,
        ],
    )?;
    Ok(())
}
