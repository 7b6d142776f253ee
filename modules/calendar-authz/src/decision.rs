//! Access decision manager: aggregates voter votes into allow/deny.

use std::sync::Arc;

use calendar_security::SecurityContext;

use crate::attribute::Attribute;
use crate::config::{AccessPolicyConfig, DecisionStrategy};
use crate::error::AuthzError;
use crate::voter::{UserVoter, Vote, VoteSubject, Voter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

#[derive(Clone)]
pub struct AccessDecisionManager {
    voters: Vec<Arc<dyn Voter>>,
    strategy: DecisionStrategy,
    allow_if_all_abstain: bool,
}

impl std::fmt::Debug for AccessDecisionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.voters.iter().map(|v| v.name()).collect();
        f.debug_struct("AccessDecisionManager")
            .field("voters", &names)
            .field("strategy", &self.strategy)
            .field("allow_if_all_abstain", &self.allow_if_all_abstain)
            .finish()
    }
}

impl AccessDecisionManager {
    #[must_use]
    pub fn new(config: &AccessPolicyConfig, voters: Vec<Arc<dyn Voter>>) -> Self {
        Self {
            voters,
            strategy: config.decision_strategy,
            allow_if_all_abstain: config.allow_if_all_abstain,
        }
    }

    /// Manager with the built-in [`UserVoter`].
    #[must_use]
    pub fn with_default_voters(config: &AccessPolicyConfig) -> Self {
        Self::new(config, vec![Arc::new(UserVoter)])
    }

    #[must_use]
    pub fn decide(
        &self,
        ctx: &SecurityContext,
        attribute: Attribute,
        subject: &dyn VoteSubject,
    ) -> Decision {
        let mut granted = 0usize;
        let mut denied = 0usize;
        for voter in &self.voters {
            match voter.vote(ctx, attribute, subject) {
                Vote::Granted => granted += 1,
                Vote::Denied => denied += 1,
                Vote::Abstain => {}
            }
        }

        let decision = match (self.strategy, granted, denied) {
            (_, 0, 0) => self.abstain_decision(),
            (DecisionStrategy::Affirmative, 0, _) | (DecisionStrategy::Unanimous, _, 1..) => {
                Decision::Deny
            }
            _ => Decision::Allow,
        };
        tracing::debug!(
            %attribute,
            granted,
            denied,
            ?decision,
            "access decision"
        );
        decision
    }

    /// # Errors
    /// Returns [`AuthzError::AccessDenied`] unless the decision is `Allow`.
    pub fn deny_unless_granted<S>(
        &self,
        ctx: &SecurityContext,
        attribute: Attribute,
        subject: &S,
    ) -> Result<(), AuthzError>
    where
        S: VoteSubject + std::fmt::Display,
    {
        match self.decide(ctx, attribute, subject) {
            Decision::Allow => Ok(()),
            Decision::Deny => Err(AuthzError::AccessDenied {
                attribute,
                subject: subject.to_string(),
            }),
        }
    }

    fn abstain_decision(&self) -> Decision {
        if self.allow_if_all_abstain {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}
