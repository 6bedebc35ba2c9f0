//! Form Schema Store tests: defaults on missing rows, upsert behavior,
//! and structural validation of admin input.

mod common;

use rusqlite::params;

use common::*;
use uniportal::errors::AppError;
use uniportal::models::form_schema::{self, FormField, SchemaInput};
use uniportal::models::submission::SubmissionKind;

const KINDS: [SubmissionKind; 3] = [
    SubmissionKind::Admission,
    SubmissionKind::CourseRegistration,
    SubmissionKind::CustomForm,
];

#[test]
fn missing_schema_yields_inactive_defaults() {
    let (_dir, conn) = setup_test_db();

    for kind in KINDS {
        let schema = form_schema::get_schema(&conn, kind).expect("get_schema");
        assert_eq!(schema.form_id, kind.schema_id());
        assert!(!schema.is_active, "{kind} must default to inactive");
        assert!(!schema.title.is_empty());
        assert!(schema.fields.is_empty());
        assert!(schema.updated_at.is_none());
    }
}

#[test]
fn put_then_get_roundtrips() {
    let (_dir, conn) = setup_test_db();

    let input = SchemaInput {
        title: "Fall Admission".to_string(),
        description: "Open for the fall term.".to_string(),
        is_active: true,
        fields: vec![],
    };
    form_schema::put_schema(&conn, SubmissionKind::Admission, &input).expect("put_schema");

    let schema = form_schema::get_schema(&conn, SubmissionKind::Admission).expect("get_schema");
    assert_eq!(schema.title, "Fall Admission");
    assert_eq!(schema.description, "Open for the fall term.");
    assert!(schema.is_active);
    assert!(schema.updated_at.is_some(), "upsert must stamp updated_at");
}

#[test]
fn put_is_a_full_upsert() {
    let (_dir, conn) = setup_test_db();

    activate_schema(&conn, SubmissionKind::CustomForm, vec![text_field("subject", true)]);

    let replacement = SchemaInput {
        title: "Feedback".to_string(),
        description: String::new(),
        is_active: false,
        fields: vec![text_field("comments", false)],
    };
    form_schema::put_schema(&conn, SubmissionKind::CustomForm, &replacement).expect("put");

    let schema = form_schema::get_schema(&conn, SubmissionKind::CustomForm).expect("get");
    assert_eq!(schema.title, "Feedback");
    assert!(!schema.is_active);
    assert_eq!(schema.fields.len(), 1);
    assert_eq!(schema.fields[0].key, "comments");
}

#[test]
fn rejects_empty_title() {
    let (_dir, conn) = setup_test_db();

    let input = SchemaInput {
        title: "   ".to_string(),
        description: String::new(),
        is_active: true,
        fields: vec![],
    };
    let result = form_schema::put_schema(&conn, SubmissionKind::Admission, &input);
    assert!(matches!(result, Err(AppError::InvalidPayload(_))));
}

#[test]
fn rejects_too_many_fields() {
    let (_dir, conn) = setup_test_db();

    let fields: Vec<FormField> = (0..11).map(|i| text_field(&format!("f{i}"), false)).collect();
    let input = SchemaInput {
        title: "Big".to_string(),
        description: String::new(),
        is_active: true,
        fields,
    };
    let result = form_schema::put_schema(&conn, SubmissionKind::CustomForm, &input);
    assert!(matches!(result, Err(AppError::InvalidPayload(_))));
}

#[test]
fn rejects_duplicate_and_malformed_keys() {
    let (_dir, conn) = setup_test_db();

    let input = SchemaInput {
        title: "Dupes".to_string(),
        description: String::new(),
        is_active: true,
        fields: vec![text_field("subject", true), text_field("subject", false)],
    };
    let result = form_schema::put_schema(&conn, SubmissionKind::CustomForm, &input);
    match result {
        Err(AppError::InvalidPayload(errors)) => {
            assert!(errors.iter().any(|e| e.contains("Duplicate")));
        }
        other => panic!("Expected InvalidPayload, got {other:?}"),
    }

    let input = SchemaInput {
        title: "Bad key".to_string(),
        description: String::new(),
        is_active: true,
        fields: vec![text_field("has space", true)],
    };
    let result = form_schema::put_schema(&conn, SubmissionKind::CustomForm, &input);
    assert!(matches!(result, Err(AppError::InvalidPayload(_))));
}

#[test]
fn rejects_unsupported_field_type() {
    let (_dir, conn) = setup_test_db();

    let mut field = text_field("subject", true);
    field.field_type = "dropdown".to_string();
    let input = SchemaInput {
        title: "Types".to_string(),
        description: String::new(),
        is_active: true,
        fields: vec![field],
    };
    let result = form_schema::put_schema(&conn, SubmissionKind::CustomForm, &input);
    assert!(matches!(result, Err(AppError::InvalidPayload(_))));
}

#[test]
fn rejects_fields_on_fixed_kinds() {
    let (_dir, conn) = setup_test_db();

    let input = SchemaInput {
        title: "Admission".to_string(),
        description: String::new(),
        is_active: true,
        fields: vec![text_field("extra", false)],
    };
    let result = form_schema::put_schema(&conn, SubmissionKind::Admission, &input);
    assert!(matches!(result, Err(AppError::InvalidPayload(_))));
}

#[test]
fn malformed_fields_column_degrades_to_empty() {
    let (_dir, conn) = setup_test_db();

    conn.execute(
        "INSERT INTO form_schemas (form_id, title, description, is_active, fields) \
         VALUES (?1, 'Broken', '', 1, 'not json')",
        params![SubmissionKind::CustomForm.schema_id()],
    )
    .expect("insert raw row");

    let schema = form_schema::get_schema(&conn, SubmissionKind::CustomForm).expect("get_schema");
    assert!(schema.is_active);
    assert!(schema.fields.is_empty(), "bad JSON must not break reads");
}
