//! Input validation helpers
//!
//! Request DTOs derive [`validator::Validate`]; handlers and services call
//! [`validate_payload`] to turn field errors into an [`AppError`].

use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Notes and reasons (reject note, service request note)
pub const MAX_NOTE_LEN: usize = 500;

/// Storage paths of uploaded images
pub const MAX_PATH_LEN: usize = 1024;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate a DTO, reporting every failing field in `details.fields`
pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate().map_err(validation_error)
}

fn validation_error(errors: ValidationErrors) -> AppError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| field.to_string())
        .collect();
    fields.sort();
    AppError::validation(format!("Invalid fields: {}", fields.join(", "))).with_detail(
        "fields",
        Value::from(fields),
    )
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use shared::models::DiningTableCreate;

    #[test]
    fn test_validate_payload_reports_fields() {
        let payload = DiningTableCreate {
            table_number: 0,
            label: None,
            capacity: Some(500),
        };
        let err = validate_payload(&payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let fields = err.details.unwrap()["fields"].clone();
        assert_eq!(fields, serde_json::json!(["capacity", "table_number"]));
    }

    #[test]
    fn test_optional_text_limit() {
        assert!(validate_optional_text(&None, "note", 3).is_ok());
        assert!(validate_optional_text(&Some("abc".into()), "note", 3).is_ok());
        assert!(validate_optional_text(&Some("abcd".into()), "note", 3).is_err());
    }
}
