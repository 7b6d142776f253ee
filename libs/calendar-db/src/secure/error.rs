use thiserror::Error;

/// Errors raised by scoped query execution.
#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
}
