use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};

use super::types::{AdmissionPayload, CourseRegistrationPayload, SubmissionPayload};
use crate::models::form_schema::FormField;

const MAX_CUSTOM_VALUE_LEN: usize = 5000;
const MAX_SELECTED_COURSES: usize = 8;

fn check_required(value: &str, name: &str, max_len: usize, errors: &mut Vec<String>) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(format!("{name} is required"));
    } else if trimmed.len() > max_len {
        errors.push(format!("{name} must be at most {max_len} characters"));
    }
}

pub fn validate_admission(payload: &AdmissionPayload) -> Vec<String> {
    let mut errors = Vec::new();

    let name = payload.full_name.trim();
    if name.len() < 2 {
        errors.push("Full name must be at least 2 characters".to_string());
    } else if name.len() > 100 {
        errors.push("Full name must be at most 100 characters".to_string());
    }

    match NaiveDate::parse_from_str(payload.date_of_birth.trim(), "%Y-%m-%d") {
        Ok(date) => {
            if date > Utc::now().date_naive() {
                errors.push("Date of birth must not be in the future".to_string());
            } else if date.year() < 1900 {
                errors.push("Date of birth must be in 1900 or later".to_string());
            }
        }
        Err(_) => errors.push("Date of birth must be a valid YYYY-MM-DD date".to_string()),
    }

    check_required(&payload.desired_program, "Desired program", 100, &mut errors);

    let statement = payload.statement.trim();
    if statement.len() < 50 {
        errors.push("Statement must be at least 50 characters".to_string());
    } else if statement.len() > 2000 {
        errors.push("Statement must be at most 2000 characters".to_string());
    }

    check_required(&payload.previous_school, "Previous school", 200, &mut errors);
    check_required(&payload.previous_grade, "Previous grade", 20, &mut errors);

    errors
}

pub fn validate_course_registration(payload: &CourseRegistrationPayload) -> Vec<String> {
    let mut errors = Vec::new();

    let student_id = payload.student_id.trim();
    if student_id.is_empty() {
        errors.push("Student ID is required".to_string());
    } else if student_id.len() > 40 {
        errors.push("Student ID must be at most 40 characters".to_string());
    } else if !student_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.push("Student ID may only contain letters, numbers, '-' and '_'".to_string());
    }

    check_required(&payload.term, "Term", 40, &mut errors);

    if payload.selected_courses.is_empty() {
        errors.push("At least one course must be selected".to_string());
    } else if payload.selected_courses.len() > MAX_SELECTED_COURSES {
        errors.push(format!(
            "At most {MAX_SELECTED_COURSES} courses may be selected"
        ));
    }
    let mut seen = std::collections::HashSet::new();
    for course in &payload.selected_courses {
        let trimmed = course.trim();
        if trimmed.is_empty() {
            errors.push("Course names must not be empty".to_string());
        } else if trimmed.len() > 100 {
            errors.push(format!("Course name '{trimmed}' is too long"));
        }
        if !trimmed.is_empty() && !seen.insert(trimmed.to_string()) {
            errors.push(format!("Course '{trimmed}' is selected twice"));
        }
    }

    errors
}

/// Validate custom form values against the schema's declared fields at
/// submission time. Keys must exactly match the declared set: every required
/// field present and non-empty, no unknown keys.
pub fn validate_custom(values: &BTreeMap<String, String>, fields: &[FormField]) -> Vec<String> {
    let mut errors = Vec::new();

    for field in fields {
        let value = values.get(&field.key).map(|v| v.trim()).unwrap_or("");
        if field.is_required && value.is_empty() {
            errors.push(format!("Field '{}' is required", field.label));
        }
    }

    for (key, value) in values {
        if !fields.iter().any(|f| &f.key == key) {
            errors.push(format!("Unknown field '{key}'"));
        } else if value.len() > MAX_CUSTOM_VALUE_LEN {
            errors.push(format!(
                "Field '{key}' must be at most {MAX_CUSTOM_VALUE_LEN} characters"
            ));
        }
    }

    errors
}

/// Dispatch validation for a parsed payload against the current schema
/// snapshot. Returns field-level messages; empty means acceptable.
pub fn validate_payload(payload: &SubmissionPayload, fields: &[FormField]) -> Vec<String> {
    match payload {
        SubmissionPayload::Admission(p) => validate_admission(p),
        SubmissionPayload::CourseRegistration(p) => validate_course_registration(p),
        SubmissionPayload::Custom(values) => validate_custom(values, fields),
    }
}
