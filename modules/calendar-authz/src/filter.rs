//! Row-scoping filter.
//!
//! Narrows queries against protected resource types to rows the caller owns.
//! Evaluation order:
//!
//! 1. tag outside the protected set → unfiltered
//! 2. caller holds `ROLE_ADMIN` → unfiltered
//! 3. policy in public-access mode → unfiltered
//! 4. no principal → [`AuthzError::PrincipalRequired`]
//! 5. otherwise → `<ownership property> = principal.id`
//!
//! The same scope applies to collection and single-item reads.

use std::sync::Arc;

use calendar_db::secure::{ScopableEntity, Scoped, SecureSelect, Unscoped};
use calendar_security::{AccessScope, SecurityContext};
use sea_orm::{ColumnTrait, EntityTrait};

use crate::config::AccessPolicyConfig;
use crate::error::AuthzError;
use crate::resource::ResourceKind;

#[derive(Debug, Clone)]
pub struct RowScopingFilter {
    config: Arc<AccessPolicyConfig>,
}

impl RowScopingFilter {
    #[must_use]
    pub fn new(config: Arc<AccessPolicyConfig>) -> Self {
        Self { config }
    }

    /// Compute the access scope for reads of `resource_type` by `ctx`.
    ///
    /// # Errors
    /// Returns [`AuthzError::PrincipalRequired`] when scoping applies and the
    /// context is anonymous.
    pub fn scope(
        &self,
        resource_type: impl AsRef<str>,
        ctx: &SecurityContext,
    ) -> Result<AccessScope, AuthzError> {
        let tag = resource_type.as_ref();
        let Some(kind) = ResourceKind::from_tag(tag) else {
            tracing::trace!(resource_type = tag, "unprotected resource type; not scoping");
            return Ok(AccessScope::allow_all());
        };
        if ctx.is_admin() {
            tracing::trace!(resource_type = tag, "administrator; not scoping");
            return Ok(AccessScope::allow_all());
        }
        if self.config.is_public_access() {
            tracing::trace!(resource_type = tag, "public access mode; not scoping");
            return Ok(AccessScope::allow_all());
        }
        let principal_id = ctx.principal_id().ok_or_else(|| {
            tracing::debug!(resource_type = tag, "anonymous read of protected resource");
            AuthzError::PrincipalRequired {
                resource_type: kind.as_str().to_owned(),
            }
        })?;

        let property = kind.ownership_property();
        tracing::debug!(
            resource_type = tag,
            property,
            principal_id,
            "scoping query to principal"
        );
        Ok(AccessScope::for_property(property, principal_id))
    }

    /// Scope an unscoped select for `resource_type`.
    ///
    /// Consumes the query and returns the narrowed one; the input is never
    /// executable on its own.
    ///
    /// # Errors
    /// Same as [`RowScopingFilter::scope`].
    pub fn apply<E>(
        &self,
        select: SecureSelect<E, Unscoped>,
        resource_type: impl AsRef<str>,
        ctx: &SecurityContext,
    ) -> Result<SecureSelect<E, Scoped>, AuthzError>
    where
        E: ScopableEntity + EntityTrait,
        E::Column: ColumnTrait + Copy,
    {
        let scope = self.scope(resource_type, ctx)?;
        Ok(select.scope_with(&scope))
    }
}
