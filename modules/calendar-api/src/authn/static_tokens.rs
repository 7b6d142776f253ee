use std::collections::HashMap;

use async_trait::async_trait;
use calendar_security::{Principal, SecurityContext};
use secrecy::ExposeSecret;

use super::{AuthnError, IdentityConfig, PrincipalResolver, StaticAuthnConfig};

/// Resolves principals from a fixed token table.
///
/// Suitable for development and tests; unknown or empty tokens are rejected.
pub struct StaticTokenResolver {
    token_map: HashMap<String, IdentityConfig>,
}

impl StaticTokenResolver {
    #[must_use]
    pub fn from_config(cfg: &StaticAuthnConfig) -> Self {
        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.expose_secret().to_owned(), m.identity.clone()))
            .collect();
        Self { token_map }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.token_map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.token_map.is_empty()
    }
}

#[async_trait]
impl PrincipalResolver for StaticTokenResolver {
    async fn authenticate(&self, bearer_token: &str) -> Result<SecurityContext, AuthnError> {
        if bearer_token.is_empty() {
            return Err(AuthnError::Unauthorized("empty token".to_owned()));
        }
        let identity = self
            .token_map
            .get(bearer_token)
            .ok_or_else(|| AuthnError::Unauthorized("unknown token".to_owned()))?;

        let principal = Principal::new(
            identity.user_id,
            identity.username.clone(),
            identity.roles.clone(),
        );
        Ok(SecurityContext::builder()
            .principal(principal)
            .bearer_token(bearer_token.to_owned())
            .build())
    }
}
