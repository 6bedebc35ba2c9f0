use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::token;
use crate::blobs::BlobStore;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::document::{self, NewDocument};

#[derive(Deserialize)]
pub struct UploadQuery {
    pub file_name: String,
    pub context: Option<String>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub context: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
}

/// POST /documents?file_name=&context= - store the raw body as a blob and
/// record its metadata. Admin-owned contexts require the admin gate.
pub async fn upload(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    blobs: web::Data<BlobStore>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;

    let context = query.context.as_deref().unwrap_or("general");
    if !document::valid_context(context) {
        return Err(AppError::invalid(format!("Unknown document context '{context}'")));
    }
    if matches!(context, "admin" | "timetable") {
        token::require_admin(&identity)?;
    }
    if query.file_name.trim().is_empty() {
        return Err(AppError::invalid("file_name is required"));
    }
    if body.is_empty() {
        return Err(AppError::invalid("File body must not be empty"));
    }

    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let stored_name = blobs.store(&query.file_name, &body).map_err(AppError::Blob)?;

    let new = NewDocument {
        original_file_name: query.file_name.trim().to_string(),
        stored_name: stored_name.clone(),
        download_url: format!("/files/{stored_name}"),
        content_type,
        size: body.len() as i64,
        context: context.to_string(),
        uploaded_by: identity.id,
    };
    let id = document::record(&conn, &new)?;
    log::info!("User {} uploaded document {id} ({context})", identity.id);

    Ok(HttpResponse::Created().json(json!({
        "id": id,
        "download_url": new.download_url,
        "original_file_name": new.original_file_name,
    })))
}

/// GET /documents?context= - metadata listing, newest first.
pub async fn list(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    token::require_identity(&req, &conn)?;

    if let Some(ctx) = query.context.as_deref() {
        if !document::valid_context(ctx) {
            return Err(AppError::invalid(format!("Unknown document context '{ctx}'")));
        }
    }

    let items = document::list_by_context(&conn, query.context.as_deref())?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /admin/documents/delete - remove metadata, best-effort-remove blob.
/// A failed blob delete is logged; the metadata row goes away regardless.
pub async fn delete(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    blobs: web::Data<BlobStore>,
    body: web::Json<DeleteRequest>,
) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;
    token::require_admin(&identity)?;

    let doc = document::get_by_id(&conn, body.id)?;
    if let Err(e) = blobs.delete(&doc.stored_name) {
        log::warn!("Blob delete failed for document {} ({}): {e}", doc.id, doc.stored_name);
    }
    document::delete(&conn, body.id)?;
    log::info!("Admin {} deleted document {}", identity.id, doc.id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Document deleted" })))
}
