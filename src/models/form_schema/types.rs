use serde::{Deserialize, Serialize};

use crate::models::submission::SubmissionKind;

/// Upper bound on custom form fields per schema.
pub const MAX_FIELDS: usize = 10;

pub const FIELD_TYPE_TEXT: &str = "text";
pub const FIELD_TYPE_TEXTAREA: &str = "textarea";

/// One admin-declared field of the custom form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: String,
    pub is_required: bool,
}

/// Admin-configured schema for one form kind.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub form_id: String,
    pub title: String,
    pub description: String,
    pub is_active: bool,
    pub fields: Vec<FormField>,
    /// None until an admin has persisted the schema at least once.
    pub updated_at: Option<String>,
}

/// Incoming schema update from the admin configuration surface.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub is_active: bool,
    #[serde(default)]
    pub fields: Vec<FormField>,
}

/// Hard-coded schema used when nothing is persisted for a kind.
/// Absence is "inactive by default", never an error.
pub fn defaults(kind: SubmissionKind) -> FormSchema {
    let (title, description) = match kind {
        SubmissionKind::Admission => (
            "Admission Application",
            "Apply for admission to the college.",
        ),
        SubmissionKind::CourseRegistration => (
            "Course Registration",
            "Register for courses for the upcoming term.",
        ),
        SubmissionKind::CustomForm => ("Custom Form", ""),
    };
    FormSchema {
        form_id: kind.schema_id().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        is_active: false,
        fields: Vec::new(),
        updated_at: None,
    }
}

fn valid_field_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Structural checks on an incoming schema update. Returns one message per
/// problem; an empty list means the input is acceptable.
pub fn validate_input(kind: SubmissionKind, input: &SchemaInput) -> Vec<String> {
    let mut errors = Vec::new();

    if input.title.trim().is_empty() {
        errors.push("Title is required".to_string());
    }
    if input.title.trim().len() > 200 {
        errors.push("Title must be at most 200 characters".to_string());
    }
    if input.description.len() > 2000 {
        errors.push("Description must be at most 2000 characters".to_string());
    }

    if kind != SubmissionKind::CustomForm {
        if !input.fields.is_empty() {
            errors.push("Fields are only supported on the custom form".to_string());
        }
        return errors;
    }

    if input.fields.len() > MAX_FIELDS {
        errors.push(format!("At most {MAX_FIELDS} fields are allowed"));
    }

    let mut seen = std::collections::HashSet::new();
    for field in &input.fields {
        if !valid_field_key(&field.key) {
            errors.push(format!(
                "Field key '{}' may only contain letters, numbers, and underscores",
                field.key
            ));
        }
        if field.key.len() > 50 {
            errors.push(format!("Field key '{}' must be at most 50 characters", field.key));
        }
        if !seen.insert(field.key.clone()) {
            errors.push(format!("Duplicate field key '{}'", field.key));
        }
        if field.label.trim().is_empty() {
            errors.push(format!("Field '{}' is missing a label", field.key));
        }
        if field.label.trim().len() > 100 {
            errors.push(format!(
                "Label for field '{}' must be at most 100 characters",
                field.key
            ));
        }
        if field.field_type != FIELD_TYPE_TEXT && field.field_type != FIELD_TYPE_TEXTAREA {
            errors.push(format!(
                "Field '{}' has unsupported type '{}'",
                field.key, field.field_type
            ));
        }
    }

    errors
}
