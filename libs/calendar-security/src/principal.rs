use serde::{Deserialize, Serialize};

use crate::constants::ROLE_ADMIN;

/// The authenticated actor behind a request.
///
/// Resolved once per request by the authentication layer and never mutated
/// afterwards. The identifier is the primary key of the actor's `user` row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: i64,
    username: String,
    #[serde(default)]
    roles: Vec<String>,
}

impl Principal {
    /// Create a principal. Duplicate role names are collapsed.
    #[must_use]
    pub fn new(id: i64, username: impl Into<String>, roles: Vec<String>) -> Self {
        let mut roles = roles;
        roles.sort_unstable();
        roles.dedup();
        Self {
            id,
            username: username.into(),
            roles,
        }
    }

    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Granted roles, sorted.
    #[must_use]
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Whether the principal holds the administrator role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}
