//! Attribute voters.

use calendar_security::SecurityContext;

use crate::attribute::Attribute;
use crate::resource::{ResourceKind, ResourceRef};

/// A single voter's opinion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Granted,
    Denied,
    /// The voter does not handle this attribute/subject pair.
    Abstain,
}

/// Something a voter can be asked about.
pub trait VoteSubject {
    fn resource_kind(&self) -> ResourceKind;
    fn resource_id(&self) -> i64;
}

impl VoteSubject for ResourceRef {
    fn resource_kind(&self) -> ResourceKind {
        self.kind
    }

    fn resource_id(&self) -> i64 {
        self.id
    }
}

/// Decides on one attribute for one subject.
///
/// Implementors only write `supports` and `vote_on_attribute`; `vote`
/// abstains whenever `supports` is false.
pub trait Voter: Send + Sync {
    fn name(&self) -> &'static str;

    fn supports(&self, attribute: Attribute, subject: &dyn VoteSubject) -> bool;

    /// Called only for supported pairs; must return a definite answer.
    fn vote_on_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: Attribute,
        subject: &dyn VoteSubject,
    ) -> bool;

    fn vote(
        &self,
        ctx: &SecurityContext,
        attribute: Attribute,
        subject: &dyn VoteSubject,
    ) -> Vote {
        if !self.supports(attribute, subject) {
            return Vote::Abstain;
        }
        if self.vote_on_attribute(ctx, attribute, subject) {
            Vote::Granted
        } else {
            Vote::Denied
        }
    }
}

/// Self-service on the `user` resource: a user may read, update and delete
/// only their own account. Anonymous callers are always denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserVoter;

impl Voter for UserVoter {
    fn name(&self) -> &'static str {
        "user"
    }

    fn supports(&self, attribute: Attribute, subject: &dyn VoteSubject) -> bool {
        subject.resource_kind() == ResourceKind::User && attribute.is_user_attribute()
    }

    fn vote_on_attribute(
        &self,
        ctx: &SecurityContext,
        attribute: Attribute,
        subject: &dyn VoteSubject,
    ) -> bool {
        let subject_id = subject.resource_id();
        let Some(principal_id) = ctx.principal_id() else {
            tracing::trace!(%attribute, subject_id, "anonymous caller denied");
            return false;
        };
        let granted = principal_id == subject_id;
        tracing::trace!(%attribute, subject_id, principal_id, granted, "user voter");
        granted
    }
}
