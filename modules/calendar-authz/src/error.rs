use crate::attribute::Attribute;

/// Errors raised by the authorization core.
///
/// Every variant means "no data, no action": callers must never fall back
/// to unscoped access when they see one of these.
#[derive(thiserror::Error, Debug)]
pub enum AuthzError {
    /// The access policy could not be read at startup.
    #[error("access policy configuration unavailable: {0}")]
    ConfigurationUnavailable(String),

    /// Row scoping is enforced but the request carries no principal.
    #[error("a resolved principal is required for '{resource_type}'")]
    PrincipalRequired { resource_type: String },

    /// The decision manager refused the action.
    #[error("access denied: {attribute} on {subject}")]
    AccessDenied {
        attribute: Attribute,
        subject: String,
    },
}
