//! Route handlers and the shared response/validation helpers.
//!
//! Every error body in this API has the shape `{"mensaje": …}`, where the
//! value is either a short message or, for validation failures, a list of
//! per-field errors.

pub mod brands;
pub mod equipment_statuses;
pub mod equipment_types;
pub mod health;
pub mod inventory;
pub mod login;
pub mod users;

mod catalog;

pub use catalog::{CatalogEntry, CatalogRequest};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use regex::Regex;
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

pub(crate) const SERVER_ERROR: &str = "Error en el servidor";

/// One entry of a validation error list, e.g.
/// `{"campo": "email", "mensaje": "Email es requerido"}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldError {
    #[serde(rename = "campo")]
    pub field: &'static str,
    #[serde(rename = "mensaje")]
    pub message: &'static str,
}

impl FieldError {
    pub(crate) const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

pub(crate) fn message_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "mensaje": message }))).into_response()
}

pub(crate) fn server_error() -> Response {
    message_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR)
}

pub(crate) fn validation_failed(errors: Vec<FieldError>) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "mensaje": errors }))).into_response()
}

/// Normalize an email for lookup/uniqueness checks.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Basic email format check on already-normalized input.
pub(crate) fn valid_email(email_normalized: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|regex| regex.is_match(email_normalized))
}

/// A string field that is present and not blank.
pub(crate) fn present(value: Option<&String>) -> Option<&str> {
    value.map(|value| value.trim()).filter(|value| !value.is_empty())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email(" Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn valid_email_accepts_basic_format() {
        assert!(valid_email("a@example.com"));
        assert!(!valid_email("not-an-email"));
        assert!(!valid_email("a b@example.com"));
        assert!(!valid_email(""));
    }

    #[test]
    fn present_filters_blank_and_missing_values() {
        assert_eq!(present(None), None);
        assert_eq!(present(Some(&"  ".to_string())), None);
        assert_eq!(present(Some(&" x ".to_string())), Some("x"));
    }

    #[test]
    fn field_errors_serialize_with_spanish_keys() {
        let error = FieldError::new("email", "Email es requerido");
        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["campo"], "email");
        assert_eq!(value["mensaje"], "Email es requerido");
    }
}
