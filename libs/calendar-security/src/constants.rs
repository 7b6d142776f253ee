//! Well-known role names.
//!
//! Roles are plain strings carried by a [`Principal`](crate::Principal) so that
//! identity providers can grant additional roles without a code change.

/// Administrator role. Holders bypass row-level scoping.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Role granted to every provisioned user account.
pub const ROLE_USER: &str = "ROLE_USER";
