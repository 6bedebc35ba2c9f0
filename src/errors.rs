use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(rusqlite::Error),
    Pool(r2d2::Error),
    Blob(std::io::Error),
    Hash(String),
    Unauthenticated,
    Forbidden,
    NotFound,
    InvalidPayload(Vec<String>),
    FormClosed,
    AlreadySubmitted,
}

impl AppError {
    /// Single-message convenience constructor for validation failures.
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::InvalidPayload(vec![msg.into()])
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Pool(e) => write!(f, "Pool error: {e}"),
            AppError::Blob(e) => write!(f, "Blob store error: {e}"),
            AppError::Hash(e) => write!(f, "Hash error: {e}"),
            AppError::Unauthenticated => write!(f, "Not authenticated"),
            AppError::Forbidden => write!(f, "Forbidden"),
            AppError::NotFound => write!(f, "Not found"),
            AppError::InvalidPayload(errors) => {
                write!(f, "Invalid payload: {}", errors.join("; "))
            }
            AppError::FormClosed => write!(f, "Form is currently closed"),
            AppError::AlreadySubmitted => write!(f, "Form already submitted"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => {
                HttpResponse::Unauthorized().json(json!({ "error": "Not authenticated" }))
            }
            AppError::Forbidden => {
                HttpResponse::Forbidden().json(json!({ "error": "Forbidden" }))
            }
            AppError::NotFound => {
                HttpResponse::NotFound().json(json!({ "error": "Not found" }))
            }
            AppError::InvalidPayload(errors) => HttpResponse::BadRequest()
                .json(json!({ "error": "Invalid payload", "details": errors })),
            AppError::FormClosed => HttpResponse::Conflict()
                .json(json!({ "error": "Form is currently closed", "kind": "form_closed" })),
            AppError::AlreadySubmitted => HttpResponse::Conflict()
                .json(json!({ "error": "Form already submitted", "kind": "already_submitted" })),
            // Collaborator failures: log the detail, return a generic body.
            _ => {
                log::error!("{self}");
                HttpResponse::InternalServerError()
                    .json(json!({ "error": "Internal Server Error" }))
            }
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<r2d2::Error> for AppError {
    fn from(e: r2d2::Error) -> Self {
        AppError::Pool(e)
    }
}
