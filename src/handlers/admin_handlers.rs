use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::token;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::form_schema::{self, SchemaInput};
use crate::models::notification;
use crate::models::submission::SubmissionKind;
use crate::workflow;

/// Resolve a form id from the admin surface. Accepts both schema ids
/// (as stored) and kind wire strings.
fn parse_form_id(raw: &str) -> Result<SubmissionKind, AppError> {
    [
        SubmissionKind::Admission,
        SubmissionKind::CourseRegistration,
        SubmissionKind::CustomForm,
    ]
    .into_iter()
    .find(|k| k.schema_id() == raw || k.as_str() == raw)
    .ok_or_else(|| AppError::invalid(format!("Unknown form id '{raw}'")))
}

#[derive(Deserialize)]
pub struct FormIdQuery {
    pub form_id: String,
}

#[derive(Deserialize)]
pub struct PutSchemaRequest {
    pub form_id: String,
    #[serde(flatten)]
    pub schema: SchemaInput,
}

#[derive(Deserialize)]
pub struct NotificationsQuery {
    pub limit: Option<i64>,
}

/// GET /admin/all-forms - every submission across all kinds, newest first.
pub async fn all_forms(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;
    token::require_admin(&identity)?;

    let items = workflow::list_for_admin(&conn)?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /admin/form-settings?form_id= - current schema (or defaults) for a kind.
pub async fn get_form_settings(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    query: web::Query<FormIdQuery>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_form_id(&query.form_id)?;
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;
    token::require_admin(&identity)?;

    let schema = form_schema::get_schema(&conn, kind)?;
    Ok(HttpResponse::Ok().json(schema))
}

/// POST /admin/form-settings - full upsert of a kind's schema.
pub async fn put_form_settings(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    body: web::Json<PutSchemaRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_form_id(&body.form_id)?;
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;
    token::require_admin(&identity)?;

    form_schema::put_schema(&conn, kind, &body.schema)?;
    log::info!("Admin {} updated schema {}", identity.id, kind.schema_id());
    Ok(HttpResponse::Ok().json(json!({ "message": "Settings saved" })))
}

/// GET /admin/notifications - most recent admin events, capped at 50.
pub async fn notifications(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    query: web::Query<NotificationsQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;
    token::require_admin(&identity)?;

    let limit = query
        .limit
        .unwrap_or(notification::DEFAULT_RECENT_LIMIT)
        .clamp(1, notification::DEFAULT_RECENT_LIMIT);
    let items = notification::list_recent(&conn, limit)?;
    Ok(HttpResponse::Ok().json(items))
}
