//! RFC 9457 problem details.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use serde::Serialize;

use crate::domain::error::DomainError;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

impl Problem {
    #[must_use]
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(header::CONTENT_TYPE, APPLICATION_PROBLEM_JSON)],
            Json(self),
        )
            .into_response()
    }
}

/// Map a domain error to a problem document. Storage and internal details
/// are logged, never returned.
impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        match &e {
            DomainError::NotFound { .. } => {
                Problem::new(StatusCode::NOT_FOUND, "Not Found", e.to_string())
            }
            DomainError::Validation { .. } => {
                Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Validation Failed", e.to_string())
            }
            DomainError::Conflict { .. } => {
                Problem::new(StatusCode::CONFLICT, "Conflict", e.to_string())
            }
            DomainError::Unauthorized => Problem::new(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Authentication is required to access this resource",
            ),
            DomainError::Forbidden => Problem::new(
                StatusCode::FORBIDDEN,
                "Access denied",
                "You do not have permission to perform this action",
            ),
            DomainError::Database { .. } => {
                tracing::error!(error = %e, "database error");
                Problem::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An internal database error occurred",
                )
            }
            DomainError::Internal { .. } => {
                tracing::error!(error = %e, "internal error");
                Problem::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An internal error occurred",
                )
            }
        }
    }
}
