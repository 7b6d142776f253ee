use secrecy::SecretString;
use serde::Deserialize;

/// Static token resolver configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthnConfig {
    /// Token-to-identity mappings.
    pub tokens: Vec<TokenMapping>,
}

/// Maps a static token to a specific identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    /// The bearer token value to match. Redacted in `Debug` output.
    pub token: SecretString,
    /// The identity to return when this token is presented.
    pub identity: IdentityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Identifier of the principal's `user` row.
    pub user_id: i64,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}
