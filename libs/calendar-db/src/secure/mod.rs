//! Secure ORM layer for scoped database access.
//!
//! Wraps `SeaORM` selects and deletes in a typestate that only allows
//! execution after an [`AccessScope`] has been applied.
//!
//! ```rust
//! use calendar_security::{AccessScope, pep_properties};
//!
//! let deny = AccessScope::default();
//! assert!(deny.is_deny_all());
//!
//! let owned = AccessScope::for_property(pep_properties::OWNER_ID, 1);
//! assert!(!owned.is_deny_all());
//! assert!(!owned.is_unconstrained());
//! ```

mod cond;
mod db_ops;
mod entity_traits;
mod error;
mod select;

pub use calendar_security::AccessScope;
pub use cond::build_scope_condition;
pub use db_ops::{SecureDeleteExt, SecureDeleteMany};
pub use entity_traits::ScopableEntity;
pub use error::ScopeError;
pub use select::{Scoped, SecureEntityExt, SecureSelect, Unscoped};
