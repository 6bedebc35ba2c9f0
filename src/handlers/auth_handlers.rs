use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::auth::rate_limit::RateLimiter;
use crate::auth::{password, token, validate};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::user::{self, NewUser, ROLE_STUDENT};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/register - student self-signup.
pub async fn register(
    pool: web::Data<DbPool>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let mut errors = Vec::new();
    if let Some(e) = validate::validate_username(&body.username) {
        errors.push(e);
    }
    if let Some(e) = validate::validate_email(&body.email) {
        errors.push(e);
    }
    if let Some(e) = validate::validate_password(&body.password) {
        errors.push(e);
    }
    if !errors.is_empty() {
        return Err(AppError::InvalidPayload(errors));
    }

    let hashed = password::hash_password(&body.password)
        .map_err(|_| AppError::Hash("Password hash error".to_string()))?;

    let conn = pool.get()?;
    let new = NewUser {
        username: body.username.trim().to_string(),
        password: hashed,
        email: body.email.trim().to_string(),
        display_name: body.display_name.trim().to_string(),
        role: ROLE_STUDENT.to_string(),
    };

    match user::create(&conn, &new) {
        Ok(id) => Ok(HttpResponse::Created().json(json!({ "id": id, "username": new.username }))),
        Err(AppError::Db(e)) if e.to_string().contains("UNIQUE") => {
            Err(AppError::invalid("Username already exists"))
        }
        Err(e) => Err(e),
    }
}

/// POST /auth/login - verify credentials and issue a bearer token.
pub async fn login(
    req: HttpRequest,
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    limiter: web::Data<RateLimiter>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let peer_ip = req.peer_addr().map(|a| a.ip());

    if let Some(ip) = peer_ip {
        if limiter.is_blocked(ip) {
            log::warn!("Login rate limit hit for {ip}");
            return Ok(HttpResponse::TooManyRequests()
                .json(json!({ "error": "Too many failed attempts, try again later" })));
        }
    }

    let conn = pool.get()?;
    let found = user::find_by_username(&conn, body.username.trim())?;

    let account = match found {
        Some(u) if password::verify_password(&body.password, &u.password).unwrap_or(false) => u,
        _ => {
            if let Some(ip) = peer_ip {
                limiter.record_failure(ip);
            }
            return Err(AppError::Unauthenticated);
        }
    };

    if let Some(ip) = peer_ip {
        limiter.record_success(ip);
    }

    let bearer = token::issue(&conn, account.id, config.token_ttl_days)?;
    Ok(HttpResponse::Ok().json(json!({
        "token": bearer,
        "user": {
            "id": account.id,
            "username": account.username,
            "email": account.email,
            "display_name": account.display_name,
            "role": account.role,
        }
    })))
}

/// POST /auth/logout - revoke the presented token.
pub async fn logout(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let bearer = token::bearer_from_request(&req).ok_or(AppError::Unauthenticated)?;
    let conn = pool.get()?;
    token::revoke(&conn, &bearer)?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Logged out" })))
}

/// GET /auth/me - the caller's own account.
pub async fn me(req: HttpRequest, pool: web::Data<DbPool>) -> Result<HttpResponse, AppError> {
    let conn = pool.get()?;
    let identity = token::require_identity(&req, &conn)?;
    let account = user::find_display_by_id(&conn, identity.id)?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(account))
}
