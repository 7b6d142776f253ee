use calendar_authz::AuthzError;
use calendar_db::ScopeError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: &'static str, id: i64 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// No authenticated principal where one is required.
    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied")]
    Forbidden,

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: i64) -> Self {
        Self::NotFound { entity_type, id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}

/// Unique-key violations map to `Conflict`.
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::debug!(%detail, "unique constraint violated");
                DomainError::conflict("resource already exists")
            }
            _ => DomainError::database(e.to_string()),
        }
    }
}

impl From<ScopeError> for DomainError {
    fn from(e: ScopeError) -> Self {
        let ScopeError::Db(db) = e;
        db.into()
    }
}

impl From<AuthzError> for DomainError {
    fn from(e: AuthzError) -> Self {
        match e {
            AuthzError::PrincipalRequired { resource_type } => {
                tracing::debug!(%resource_type, "anonymous access to protected resource");
                Self::Unauthorized
            }
            AuthzError::AccessDenied { attribute, subject } => {
                tracing::debug!(%attribute, %subject, "access denied by voters");
                Self::Forbidden
            }
            AuthzError::ConfigurationUnavailable(message) => {
                tracing::error!(%message, "access policy unavailable");
                Self::Internal { message }
            }
        }
    }
}
