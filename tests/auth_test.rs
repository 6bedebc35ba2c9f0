//! Identity verifier tests: password hashing, token issue/verify lifecycle,
//! expiry, and revocation.

mod common;

use rusqlite::params;

use common::*;
use uniportal::auth::{password, token};
use uniportal::errors::AppError;

#[test]
fn password_hash_roundtrip() {
    let hash = password::hash_password("correct horse").expect("hash");
    assert_ne!(hash, "correct horse");
    assert!(password::verify_password("correct horse", &hash).expect("verify"));
    assert!(!password::verify_password("wrong", &hash).expect("verify"));
}

#[test]
fn issued_token_verifies_to_owner_identity() {
    let (_dir, conn) = setup_test_db();
    let user_id = create_user(&conn, "alice", "student");

    let bearer = token::issue(&conn, user_id, 30).expect("issue");
    assert_eq!(bearer.len(), 64, "32 random bytes, hex encoded");

    let identity = token::verify(&conn, &bearer).expect("verify");
    assert_eq!(identity.id, user_id);
    assert_eq!(identity.email.as_deref(), Some("alice@example.com"));
    assert!(!identity.is_admin);
}

#[test]
fn admin_role_sets_admin_flag() {
    let (_dir, conn) = setup_test_db();
    let user_id = create_user(&conn, "root", "admin");

    let bearer = token::issue(&conn, user_id, 30).expect("issue");
    let identity = token::verify(&conn, &bearer).expect("verify");
    assert!(identity.is_admin);
    token::require_admin(&identity).expect("admin gate passes");

    let student = create_user(&conn, "bob", "student");
    let bearer = token::issue(&conn, student, 30).expect("issue");
    let identity = token::verify(&conn, &bearer).expect("verify");
    let result = token::require_admin(&identity);
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[test]
fn unknown_and_empty_tokens_are_unauthenticated() {
    let (_dir, conn) = setup_test_db();

    let result = token::verify(&conn, "deadbeef");
    assert!(matches!(result, Err(AppError::Unauthenticated)));

    let result = token::verify(&conn, "");
    assert!(matches!(result, Err(AppError::Unauthenticated)));
}

#[test]
fn expired_token_is_rejected_and_purged() {
    let (_dir, conn) = setup_test_db();
    let user_id = create_user(&conn, "alice", "student");

    let bearer = token::issue(&conn, user_id, 30).expect("issue");
    conn.execute(
        "UPDATE auth_tokens SET expires_at = '2020-01-01T00:00:00' WHERE token = ?1",
        params![bearer],
    )
    .expect("backdate expiry");

    let result = token::verify(&conn, &bearer);
    assert!(matches!(result, Err(AppError::Unauthenticated)));

    let remaining: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM auth_tokens WHERE token = ?1",
            params![bearer],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(remaining, 0, "expired tokens are deleted on sight");
}

#[test]
fn revoked_token_stops_working() {
    let (_dir, conn) = setup_test_db();
    let user_id = create_user(&conn, "alice", "student");

    let bearer = token::issue(&conn, user_id, 30).expect("issue");
    token::verify(&conn, &bearer).expect("valid before revoke");

    token::revoke(&conn, &bearer).expect("revoke");
    let result = token::verify(&conn, &bearer);
    assert!(matches!(result, Err(AppError::Unauthenticated)));

    // Revoking again is a no-op, not an error.
    token::revoke(&conn, &bearer).expect("revoke twice");
}
