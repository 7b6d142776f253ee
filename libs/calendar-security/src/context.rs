use secrecy::SecretString;

use crate::principal::Principal;

/// `SecurityContext` is the per-request view of who is calling.
///
/// Built by the authentication middleware and passed through the request
/// lifecycle. It plays the role of the "current token": the resolved
/// principal (absent for anonymous callers) plus the raw credential.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SecurityContext {
    /// The authenticated principal. `None` means anonymous.
    principal: Option<Principal>,
    /// Original bearer token. Never serialized/persisted.
    /// Wrapped in `SecretString` so `Debug` redacts the value automatically.
    #[serde(skip)]
    bearer_token: Option<SecretString>,
}

impl SecurityContext {
    /// Create a new `SecurityContext` builder
    #[must_use]
    pub fn builder() -> SecurityContextBuilder {
        SecurityContextBuilder::default()
    }

    /// Create an anonymous `SecurityContext` with no principal and no token
    #[must_use]
    pub fn anonymous() -> Self {
        SecurityContextBuilder::default().build()
    }

    /// Shorthand for a context carrying `principal` and no token.
    #[must_use]
    pub fn for_principal(principal: Principal) -> Self {
        Self::builder().principal(principal).build()
    }

    /// The resolved principal, if any.
    #[must_use]
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The principal's identifier, if any.
    #[must_use]
    pub fn principal_id(&self) -> Option<i64> {
        self.principal.as_ref().map(Principal::id)
    }

    /// Whether the caller is authenticated and holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.principal.as_ref().is_some_and(Principal::is_admin)
    }

    /// Get the original bearer token.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        self.bearer_token.as_ref()
    }
}

#[derive(Default)]
pub struct SecurityContextBuilder {
    principal: Option<Principal>,
    bearer_token: Option<SecretString>,
}

impl SecurityContextBuilder {
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    #[must_use]
    pub fn bearer_token(mut self, token: impl Into<SecretString>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn build(self) -> SecurityContext {
        SecurityContext {
            principal: self.principal,
            bearer_token: self.bearer_token,
        }
    }
}
