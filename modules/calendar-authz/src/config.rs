//! Access policy configuration.

use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::AuthzError;

/// Process-wide access policy, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessPolicyConfig {
    /// Whether row scoping is enforced.
    pub mode: ScopingMode,

    /// How the decision manager combines votes.
    pub decision_strategy: DecisionStrategy,

    /// Outcome when every voter abstains.
    pub allow_if_all_abstain: bool,
}

impl Default for AccessPolicyConfig {
    fn default() -> Self {
        Self {
            mode: ScopingMode::Enforced,
            decision_strategy: DecisionStrategy::Affirmative,
            allow_if_all_abstain: false,
        }
    }
}

/// Row-scoping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScopingMode {
    /// Non-admin callers only see their own rows.
    #[default]
    Enforced,
    /// Scoping disabled: every caller sees every row.
    PublicAccess,
}

/// Vote aggregation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStrategy {
    /// Allow as soon as one voter grants.
    #[default]
    Affirmative,
    /// Deny as soon as one voter denies.
    Unanimous,
}

impl AccessPolicyConfig {
    /// Config section key.
    pub const SECTION: &'static str = "access_policy";

    /// Policy with scoping disabled.
    #[must_use]
    pub fn public_access() -> Self {
        Self {
            mode: ScopingMode::PublicAccess,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_public_access(&self) -> bool {
        self.mode == ScopingMode::PublicAccess
    }

    /// Extract the `access_policy` section. A missing section yields defaults.
    ///
    /// # Errors
    /// Returns [`AuthzError::ConfigurationUnavailable`] if the section is
    /// present but malformed, or the underlying sources cannot be read.
    pub fn from_figment(figment: &Figment) -> Result<Self, AuthzError> {
        if !figment.contains(Self::SECTION) {
            return Ok(Self::default());
        }
        figment
            .extract_inner(Self::SECTION)
            .map_err(|e| AuthzError::ConfigurationUnavailable(e.to_string()))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use figment::providers::{Format, Yaml};

    #[test]
    fn defaults_enforce_scoping() {
        let cfg = AccessPolicyConfig::default();
        assert_eq!(cfg.mode, ScopingMode::Enforced);
        assert_eq!(cfg.decision_strategy, DecisionStrategy::Affirmative);
        assert!(!cfg.allow_if_all_abstain);
        assert!(!cfg.is_public_access());
    }

    #[test]
    fn missing_section_uses_defaults() {
        let figment = Figment::from(Yaml::string("server:\n  bind_addr: 127.0.0.1:8080\n"));
        let cfg = AccessPolicyConfig::from_figment(&figment).unwrap();
        assert_eq!(cfg.mode, ScopingMode::Enforced);
    }

    #[test]
    fn reads_public_access_mode() {
        let figment = Figment::from(Yaml::string(
            "access_policy:\n  mode: public_access\n  decision_strategy: unanimous\n",
        ));
        let cfg = AccessPolicyConfig::from_figment(&figment).unwrap();
        assert!(cfg.is_public_access());
        assert_eq!(cfg.decision_strategy, DecisionStrategy::Unanimous);
    }

    #[test]
    fn malformed_section_is_unavailable() {
        let figment = Figment::from(Yaml::string("access_policy:\n  mode: wide_open\n"));
        let err = AccessPolicyConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, AuthzError::ConfigurationUnavailable(_)));

        let figment = Figment::from(Yaml::string("access_policy:\n  unknown: 1\n"));
        let err = AccessPolicyConfig::from_figment(&figment).unwrap_err();
        assert!(matches!(err, AuthzError::ConfigurationUnavailable(_)));
    }
}
