use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use askama::Template;
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Template(askama::Error),
    Session(String),
    Csrf,
    /// A required key is missing or a referenced id does not exist.
    InvalidInput(String),
    NotFound(String),
    /// A write that should have touched a row touched none.
    StorageFailure(String),
}

/// JSON error body returned by every endpoint.
#[derive(Serialize, Debug)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Template(e) => write!(f, "Template error: {e}"),
            AppError::Session(e) => write!(f, "Session error: {e}"),
            AppError::Csrf => write!(f, "Invalid or missing CSRF token"),
            AppError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            AppError::NotFound(msg) => write!(f, "Not found: {msg}"),
            AppError::StorageFailure(msg) => write!(f, "Storage failure: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Csrf => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::InvalidInput(msg) => ApiErrorResponse {
                error: "Validation failed".to_string(),
                details: Some(msg.clone()),
            },
            AppError::NotFound(msg) => ApiErrorResponse {
                error: "Not found".to_string(),
                details: Some(msg.clone()),
            },
            AppError::Csrf => ApiErrorResponse {
                error: self.to_string(),
                details: None,
            },
            _ => {
                log::error!("{self}");
                ApiErrorResponse {
                    error: "Internal Server Error".to_string(),
                    details: None,
                }
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<askama::Error> for AppError {
    fn from(e: askama::Error) -> Self {
        AppError::Template(e)
    }
}

/// Render an askama template into an HTML response.
pub fn render<T: Template>(tmpl: T) -> Result<HttpResponse, AppError> {
    let html = tmpl.render()?;
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::InvalidInput("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Csrf.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::StorageFailure("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_includes_message() {
        let e = AppError::NotFound("custom field 7".into());
        assert_eq!(e.to_string(), "Not found: custom field 7");
    }
}
