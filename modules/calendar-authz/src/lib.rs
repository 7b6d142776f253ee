#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Authorization core of the calendar API.
//!
//! Two decision points are exposed to the request pipeline:
//!
//! - [`RowScopingFilter`] narrows queries against owned resources to the
//!   caller's rows before they run.
//! - [`AccessDecisionManager`] asks its [`Voter`]s whether an action on a
//!   concrete resource is allowed. [`UserVoter`] implements self-service on
//!   the `user` resource.

pub mod attribute;
pub mod config;
pub mod decision;
pub mod error;
pub mod filter;
pub mod resource;
pub mod voter;

pub use attribute::{Action, Attribute, ParseAttributeError};
pub use config::{AccessPolicyConfig, DecisionStrategy, ScopingMode};
pub use decision::{AccessDecisionManager, Decision};
pub use error::AuthzError;
pub use filter::RowScopingFilter;
pub use resource::{ResourceKind, ResourceRef};
pub use voter::{UserVoter, Vote, VoteSubject, Voter};
