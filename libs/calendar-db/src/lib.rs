#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Database access helpers for the calendar API.
//!
//! The [`secure`] module wraps `SeaORM` queries in a typestate that refuses to
//! execute until an [`calendar_security::AccessScope`] has been applied.

pub mod secure;

pub use secure::{ScopeError, SecureDeleteExt, SecureEntityExt, SecureSelect};
