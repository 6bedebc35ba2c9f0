//! Submission workflow: the validate→authorize→persist sequences behind the
//! form endpoints. Handlers stay thin; the rules live here.

use rusqlite::Connection;
use serde_json::Value;

use crate::auth::token::Identity;
use crate::errors::AppError;
use crate::models::form_schema;
use crate::models::notification::{self, NewNotification};
use crate::models::submission::{
    self, AdminSubmissionItem, Submission, SubmissionKind, SubmissionPayload, validate,
};

/// Create a submission: schema gate, payload validation, single-submission
/// pre-check, then persist. Returns the new submission id.
pub fn submit(
    conn: &Connection,
    identity: &Identity,
    kind: SubmissionKind,
    raw: Value,
) -> Result<i64, AppError> {
    let schema = form_schema::get_schema(conn, kind)?;
    if !schema.is_active {
        return Err(AppError::FormClosed);
    }

    let payload = SubmissionPayload::from_value(kind, raw)?;
    let errors = validate::validate_payload(&payload, &schema.fields);
    if !errors.is_empty() {
        return Err(AppError::InvalidPayload(errors));
    }

    // One submission per kind per owner. The UNIQUE constraint in storage
    // closes the race this pre-check leaves open; both paths report the
    // same error kind.
    if !submission::list_by_owner(conn, kind, identity.id)?.is_empty() {
        return Err(AppError::AlreadySubmitted);
    }

    let payload_json = payload.to_json_string()?;
    submission::create(conn, kind, identity.id, identity.email.as_deref(), &payload_json)
}

/// Fetch one of the caller's submissions. Absent ids are NotFound; ids
/// owned by someone else are Forbidden.
pub fn view_own(
    conn: &Connection,
    identity: &Identity,
    kind: SubmissionKind,
    id: i64,
) -> Result<Submission, AppError> {
    let record = submission::get_by_id(conn, kind, id)?;
    if record.owner_id != identity.id {
        return Err(AppError::Forbidden);
    }
    Ok(record)
}

/// All of the caller's submissions of one kind, newest first.
pub fn list_own(
    conn: &Connection,
    identity: &Identity,
    kind: SubmissionKind,
) -> Result<Vec<Submission>, AppError> {
    submission::list_by_owner(conn, kind, identity.id)
}

/// Delete one of the caller's submissions, then record an admin
/// notification. The notification is best-effort: once the delete has
/// committed, a failing append is logged and the delete still succeeds.
pub fn delete_own(
    conn: &Connection,
    identity: &Identity,
    kind: SubmissionKind,
    id: i64,
) -> Result<(), AppError> {
    let record = submission::get_by_id(conn, kind, id)?;
    if record.owner_id != identity.id {
        return Err(AppError::Forbidden);
    }

    submission::delete_by_id(conn, kind, id)?;

    let actor = identity
        .email
        .clone()
        .unwrap_or_else(|| format!("User #{}", identity.id));
    let event = NewNotification {
        ntype: notification::TYPE_FORM_DELETION.to_string(),
        message: format!("{actor} deleted their {} form (id: {id}).", kind.label()),
        actor_id: identity.id,
        actor_email: identity.email.clone(),
        related_submission_id: Some(id),
        related_kind: Some(kind.as_str().to_string()),
    };
    if let Err(e) = notification::append(conn, &event) {
        log::warn!("Submission {id} deleted but notification append failed: {e}");
    }

    Ok(())
}

/// Admin view: every submission across all kinds, newest first, each with a
/// one-line summary projection.
pub fn list_for_admin(conn: &Connection) -> Result<Vec<AdminSubmissionItem>, AppError> {
    let custom_title = form_schema::get_schema(conn, SubmissionKind::CustomForm)?.title;

    let items = submission::list_all(conn)?
        .into_iter()
        .map(|s| {
            let summary = summarize(&s, &custom_title);
            AdminSubmissionItem {
                id: s.id,
                kind: s.kind,
                owner_id: s.owner_id,
                owner_email: s.owner_email,
                status: s.status,
                submitted_at: s.submitted_at,
                summary,
            }
        })
        .collect();
    Ok(items)
}

fn payload_str<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or("?")
}

fn summarize(submission: &Submission, custom_title: &str) -> String {
    match submission.kind {
        SubmissionKind::Admission => format!(
            "{} - {}",
            payload_str(&submission.payload, "full_name"),
            payload_str(&submission.payload, "desired_program"),
        ),
        SubmissionKind::CourseRegistration => {
            let course_count = submission
                .payload
                .get("selected_courses")
                .and_then(Value::as_array)
                .map(|a| a.len())
                .unwrap_or(0);
            format!(
                "{} - {} ({course_count} courses)",
                payload_str(&submission.payload, "student_id"),
                payload_str(&submission.payload, "term"),
            )
        }
        SubmissionKind::CustomForm => {
            let field_count = submission
                .payload
                .as_object()
                .map(|o| o.len())
                .unwrap_or(0);
            format!("{custom_title} ({field_count} fields)")
        }
    }
}
