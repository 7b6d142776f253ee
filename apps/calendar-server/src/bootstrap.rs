//! Startup provisioning of configured accounts.

use anyhow::Context;
use calendar_api::AppServices;
use calendar_api::domain::error::DomainError;
use calendar_api::domain::model::NewUser;
use calendar_security::constants::ROLE_ADMIN;
use calendar_security::{Principal, SecurityContext};

use crate::config::BootstrapConfig;

/// Principal used for startup tasks; never reachable over HTTP.
fn system_context() -> SecurityContext {
    SecurityContext::for_principal(Principal::new(
        0,
        "system",
        vec![ROLE_ADMIN.to_owned()],
    ))
}

/// Create each configured account. Accounts whose email or identifier is
/// already taken are left as they are, so restarts are harmless.
///
/// # Errors
/// Fails on invalid account data or a storage error.
pub async fn provision_users(services: &AppServices, cfg: &BootstrapConfig) -> anyhow::Result<()> {
    let ctx = system_context();
    for user in &cfg.users {
        let new = NewUser {
            id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
            roles: user.roles.clone(),
        };
        match services.users.provision(&ctx, new).await {
            Ok(created) => tracing::info!(user_id = created.id, "provisioned bootstrap user"),
            Err(DomainError::Conflict { message }) => {
                tracing::debug!(%message, email = %user.email, "bootstrap user already present");
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to provision '{}'", user.email));
            }
        }
    }
    Ok(())
}
