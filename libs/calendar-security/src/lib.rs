#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod access_scope;
pub mod constants;
pub mod context;
pub mod principal;

pub use access_scope::{
    AccessScope, EqScopeFilter, InScopeFilter, ScopeConstraint, ScopeFilter, ScopeValue,
    pep_properties,
};
pub use context::SecurityContext;
pub use principal::Principal;
