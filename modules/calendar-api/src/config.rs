//! Configuration for the calendar API module.

use serde::{Deserialize, Serialize};

use crate::authn::StaticAuthnConfig;

/// Module configuration (`calendar_api` section).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarApiConfig {
    pub service: ServiceConfig,
    pub authn: StaticAuthnConfig,
}

/// Domain service limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    pub max_title_length: usize,
    pub default_per_page: u64,
    pub max_per_page: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_title_length: 255,
            default_per_page: 30,
            max_per_page: 100,
        }
    }
}

impl CalendarApiConfig {
    pub const SECTION: &'static str = "calendar_api";
}
