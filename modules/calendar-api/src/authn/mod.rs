//! Principal resolution from bearer tokens.

mod config;
mod static_tokens;

use async_trait::async_trait;
use calendar_security::SecurityContext;
use thiserror::Error;

pub use config::{IdentityConfig, StaticAuthnConfig, TokenMapping};
pub use static_tokens::StaticTokenResolver;

#[derive(Debug, Error)]
pub enum AuthnError {
    /// The token is invalid, expired, or unknown.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("authentication service unavailable: {0}")]
    Unavailable(String),
}

/// Turns a bearer token into a request [`SecurityContext`].
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    /// # Errors
    /// [`AuthnError::Unauthorized`] when the token is not accepted.
    async fn authenticate(&self, bearer_token: &str) -> Result<SecurityContext, AuthnError>;
}
