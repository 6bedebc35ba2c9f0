pub mod document;
pub mod form_schema;
pub mod notification;
pub mod submission;
pub mod user;
