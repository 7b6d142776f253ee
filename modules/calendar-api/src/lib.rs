#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Calendar API module.
//!
//! Layers, outermost first:
//!
//! - `api::rest`: axum routes, DTOs, problem responses, authentication middleware
//! - `domain`: services, validation, pagination, errors
//! - `infra::storage`: sea-orm entities and schema bootstrap
//!
//! Every read of a protected resource goes through
//! [`calendar_authz::RowScopingFilter`]; actions on user accounts are also
//! checked by [`calendar_authz::AccessDecisionManager`].

pub mod api;
pub mod authn;
pub mod config;
pub mod domain;
pub mod infra;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::rest::routes::{ApiState, router};
pub use authn::{AuthnError, PrincipalResolver, StaticTokenResolver};
pub use config::{CalendarApiConfig, ServiceConfig};
pub use domain::service::AppServices;
pub use infra::storage::schema::create_tables;
