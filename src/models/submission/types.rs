use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const STATUS_SUBMITTED: &str = "submitted";

/// Discriminator selecting which form template a submission belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionKind {
    Admission,
    CourseRegistration,
    CustomForm,
}

impl SubmissionKind {
    /// Wire string, used in routes, query params, and the kind column.
    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionKind::Admission => "admission",
            SubmissionKind::CourseRegistration => "course_registration",
            SubmissionKind::CustomForm => "custom_form",
        }
    }

    /// Identifier of the kind's schema row. The custom form uses the single
    /// global template id inherited from the original data.
    pub fn schema_id(self) -> &'static str {
        match self {
            SubmissionKind::Admission => "admission",
            SubmissionKind::CourseRegistration => "courseRegistration",
            SubmissionKind::CustomForm => "mainGlobalCustomForm",
        }
    }

    /// Human-readable name for messages and notifications.
    pub fn label(self) -> &'static str {
        match self {
            SubmissionKind::Admission => "Admission",
            SubmissionKind::CourseRegistration => "Course Registration",
            SubmissionKind::CustomForm => "Custom Form",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admission" => Some(SubmissionKind::Admission),
            "course_registration" => Some(SubmissionKind::CourseRegistration),
            "custom_form" => Some(SubmissionKind::CustomForm),
            _ => None,
        }
    }
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Admission application payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdmissionPayload {
    pub full_name: String,
    pub date_of_birth: String,
    pub desired_program: String,
    pub statement: String,
    pub previous_school: String,
    pub previous_grade: String,
}

/// Course registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseRegistrationPayload {
    pub student_id: String,
    pub term: String,
    pub selected_courses: Vec<String>,
}

/// Kind-specific payload: fixed shapes for the two built-in forms, an
/// open key/value mapping for the custom form.
#[derive(Debug, Clone)]
pub enum SubmissionPayload {
    Admission(AdmissionPayload),
    CourseRegistration(CourseRegistrationPayload),
    Custom(BTreeMap<String, String>),
}

impl SubmissionPayload {
    /// Parse a raw JSON body into the payload shape for a kind.
    pub fn from_value(kind: SubmissionKind, raw: serde_json::Value) -> Result<Self, AppError> {
        let parsed = match kind {
            SubmissionKind::Admission => serde_json::from_value(raw)
                .map(SubmissionPayload::Admission)
                .map_err(|e| AppError::invalid(format!("Malformed admission payload: {e}"))),
            SubmissionKind::CourseRegistration => serde_json::from_value(raw)
                .map(SubmissionPayload::CourseRegistration)
                .map_err(|e| {
                    AppError::invalid(format!("Malformed course registration payload: {e}"))
                }),
            SubmissionKind::CustomForm => serde_json::from_value(raw)
                .map(SubmissionPayload::Custom)
                .map_err(|e| AppError::invalid(format!("Malformed custom form payload: {e}"))),
        }?;
        Ok(parsed)
    }

    pub fn to_json_string(&self) -> Result<String, AppError> {
        let result = match self {
            SubmissionPayload::Admission(p) => serde_json::to_string(p),
            SubmissionPayload::CourseRegistration(p) => serde_json::to_string(p),
            SubmissionPayload::Custom(map) => serde_json::to_string(map),
        };
        result.map_err(|e| AppError::invalid(format!("Payload is not serializable: {e}")))
    }
}

/// Stored submission as returned by the repository. payload is the raw
/// kind-specific JSON; submitted_at is normalized or None for legacy rows
/// with unparseable dates.
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub id: i64,
    pub kind: SubmissionKind,
    pub owner_id: i64,
    pub owner_email: Option<String>,
    pub status: String,
    pub submitted_at: Option<String>,
    pub payload: serde_json::Value,
}

/// Admin listing row: the submission plus a kind-specific one-line summary.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSubmissionItem {
    pub id: i64,
    pub kind: SubmissionKind,
    pub owner_id: i64,
    pub owner_email: Option<String>,
    pub status: String,
    pub submitted_at: Option<String>,
    pub summary: String,
}
