use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::token;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::submission::SubmissionKind;
use crate::workflow;

fn parse_kind(raw: &str) -> Result<SubmissionKind, AppError> {
    SubmissionKind::parse(raw).ok_or_else(|| AppError::invalid(format!("Unknown form kind '{raw}'")))
}

#[derive(Deserialize)]
pub struct KindQuery {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
pub struct DetailQuery {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

/// POST /forms/{kind} - create a submission for the caller.
pub async fn submit(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&path)?;
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;

    let id = workflow::submit(&conn, &identity, kind, body.into_inner())?;
    log::info!("User {} submitted {} form {id}", identity.id, kind);
    Ok(HttpResponse::Created().json(json!({ "id": id, "message": "Form submitted" })))
}

/// GET /user/forms?type= - the caller's submissions of one kind.
pub async fn list_own(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    query: web::Query<KindQuery>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&query.kind)?;
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;

    let items = workflow::list_own(&conn, &identity, kind)?;
    Ok(HttpResponse::Ok().json(items))
}

/// GET /user/form-detail?id=&type= - one of the caller's submissions.
pub async fn detail(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    query: web::Query<DetailQuery>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&query.kind)?;
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;

    let record = workflow::view_own(&conn, &identity, kind, query.id)?;
    Ok(HttpResponse::Ok().json(record))
}

/// POST /user/delete-form - delete one of the caller's submissions.
pub async fn delete(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    body: web::Json<DeleteRequest>,
) -> Result<HttpResponse, AppError> {
    let kind = parse_kind(&body.kind)?;
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;

    workflow::delete_own(&conn, &identity, kind, body.id)?;
    log::info!("User {} deleted {} form {}", identity.id, kind, body.id);
    Ok(HttpResponse::Ok().json(json!({ "message": "Form deleted" })))
}
