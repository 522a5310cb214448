use crate::errors::AppError;

/// Width of the name/label/value VARCHAR columns.
pub const MAX_TEXT_COLUMN: usize = 255;

/// Validate a required text field with a max length.
pub fn validate_required(value: Option<&str>, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.map(str::trim).unwrap_or("");
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate a required reference id (absent ids are filtered by the cast layer).
pub fn validate_required_id(value: Option<i64>, field_name: &str) -> Option<String> {
    match value {
        Some(id) if id > 0 => None,
        _ => Some(format!("{field_name} is required")),
    }
}

/// Collapse collected messages into a single InvalidInput error.
pub fn into_result(errors: Vec<String>) -> Result<(), AppError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidInput(errors.join("; ")))
    }
}
