use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::AppError;
use crate::models::user::ROLE_ADMIN;
use crate::timefmt;

/// Verified caller identity, produced by [`verify`] from a bearer token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: i64,
    pub email: Option<String>,
    pub is_admin: bool,
}

/// Generate a random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Issue a new bearer token for a user. The token value is returned to the
/// caller exactly once; the server keeps it for lookup until expiry or revoke.
pub fn issue(conn: &Connection, user_id: i64, ttl_days: i64) -> Result<String, AppError> {
    let token = generate_token();
    let expires_at = (Utc::now() + Duration::days(ttl_days))
        .format(timefmt::CANONICAL_FORMAT)
        .to_string();
    conn.execute(
        "INSERT INTO auth_tokens (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
        params![token, user_id, expires_at],
    )?;
    Ok(token)
}

/// Validate a bearer token and resolve the caller identity.
/// Missing, unknown, and expired tokens all fail the same way.
pub fn verify(conn: &Connection, token: &str) -> Result<Identity, AppError> {
    if token.is_empty() {
        return Err(AppError::Unauthenticated);
    }

    let row = conn
        .query_row(
            "SELECT t.expires_at, u.id, u.email, u.role \
             FROM auth_tokens t \
             JOIN users u ON u.id = t.user_id \
             WHERE t.token = ?1",
            params![token],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let (expires_at, user_id, email, role) = match row {
        Some(r) => r,
        None => return Err(AppError::Unauthenticated),
    };

    // Canonical-format timestamps compare correctly as strings.
    if expires_at.as_str() <= timefmt::now().as_str() {
        conn.execute("DELETE FROM auth_tokens WHERE token = ?1", params![token])?;
        return Err(AppError::Unauthenticated);
    }

    Ok(Identity {
        id: user_id,
        email: if email.trim().is_empty() { None } else { Some(email) },
        is_admin: role == ROLE_ADMIN,
    })
}

/// Revoke a token (logout). Unknown tokens are a no-op.
pub fn revoke(conn: &Connection, token: &str) -> Result<(), AppError> {
    conn.execute("DELETE FROM auth_tokens WHERE token = ?1", params![token])?;
    Ok(())
}

/// Extract the bearer token from the Authorization header, if any.
pub fn bearer_from_request(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve the caller identity for a request, or fail Unauthenticated.
pub fn require_identity(req: &HttpRequest, conn: &Connection) -> Result<Identity, AppError> {
    let token = bearer_from_request(req).ok_or(AppError::Unauthenticated)?;
    verify(conn, &token)
}

/// Admin gate for the /admin surface.
pub fn require_admin(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
