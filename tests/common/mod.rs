//! Shared test infrastructure for model and workflow tests.
//!
//! `setup_test_db()` creates a temporary SQLite database with the full
//! schema applied. The TempDir must be kept alive for the Connection to
//! remain valid.

use rusqlite::{Connection, params};
use tempfile::TempDir;

use uniportal::auth::token::Identity;
use uniportal::db::MIGRATIONS;
use uniportal::models::form_schema::{self, FormField, SchemaInput};
use uniportal::models::submission::SubmissionKind;

pub const TEST_EMAIL: &str = "test@example.com";

pub fn setup_test_db() -> (TempDir, Connection) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let conn = Connection::open(&db_path).expect("Failed to open test DB");

    conn.execute_batch("PRAGMA foreign_keys=ON; PRAGMA journal_mode=WAL;")
        .expect("Failed to set pragmas");
    conn.execute_batch(MIGRATIONS)
        .expect("Failed to run migrations");

    (dir, conn)
}

/// Insert a user row directly; model tests don't need a real argon2 hash.
pub fn create_user(conn: &Connection, username: &str, role: &str) -> i64 {
    conn.execute(
        "INSERT INTO users (username, password, email, display_name, role) \
         VALUES (?1, 'x', ?2, ?3, ?4)",
        params![username, format!("{username}@example.com"), username, role],
    )
    .expect("Failed to insert user");
    conn.last_insert_rowid()
}

pub fn identity(user_id: i64, email: &str) -> Identity {
    Identity {
        id: user_id,
        email: Some(email.to_string()),
        is_admin: false,
    }
}

/// Persist an active schema for a kind so submissions are accepted.
pub fn activate_schema(conn: &Connection, kind: SubmissionKind, fields: Vec<FormField>) {
    let input = SchemaInput {
        title: format!("{} (test)", kind.label()),
        description: String::new(),
        is_active: true,
        fields,
    };
    form_schema::put_schema(conn, kind, &input).expect("Failed to activate schema");
}

pub fn text_field(key: &str, required: bool) -> FormField {
    FormField {
        key: key.to_string(),
        label: key.to_string(),
        field_type: "text".to_string(),
        is_required: required,
    }
}

/// A valid admission payload; the statement clears the 50-character minimum.
pub fn admission_payload() -> serde_json::Value {
    serde_json::json!({
        "full_name": "Jane Doe",
        "date_of_birth": "2005-01-01",
        "desired_program": "computer_science",
        "statement": "I have wanted to study computer science since building my first game.",
        "previous_school": "City High",
        "previous_grade": "A",
    })
}

pub fn course_registration_payload() -> serde_json::Value {
    serde_json::json!({
        "student_id": "S-2024-001",
        "term": "fall_2026",
        "selected_courses": ["CS101", "MATH201"],
    })
}
