//! Server configuration.
//!
//! Loaded from an optional YAML file, then overlaid with `CALENDAR__*`
//! environment variables (`CALENDAR__DATABASE__URL` sets `database.url`).
//! Every section is optional and falls back to its defaults.

use std::path::Path;

use anyhow::{Context, bail};
use calendar_api::CalendarApiConfig;
use calendar_authz::AccessPolicyConfig;
use figment::Figment;
use figment::providers::{Env, Format, Yaml};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CALENDAR__";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8087".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// sea-orm connection URL (`sqlite://...` or `postgres://...`).
    pub url: String,
    pub max_connections: u32,
    /// Create missing tables at startup.
    pub create_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://calendar.db?mode=rwc".to_owned(),
            max_connections: 10,
            create_schema: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// Accounts created at startup if their email is not taken yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BootstrapConfig {
    pub users: Vec<BootstrapUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BootstrapUser {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub access_policy: AccessPolicyConfig,
    pub calendar_api: CalendarApiConfig,
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    /// Layered sources: YAML file (if any), then environment.
    ///
    /// # Errors
    /// Fails if an explicitly given file does not exist.
    pub fn figment(path: Option<&Path>) -> anyhow::Result<Figment> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// # Errors
    /// Fails on a malformed section.
    pub fn from_figment(figment: &Figment) -> anyhow::Result<Self> {
        Ok(Self {
            server: section(figment, "server")?,
            database: section(figment, "database")?,
            logging: section(figment, "logging")?,
            access_policy: AccessPolicyConfig::from_figment(figment)?,
            calendar_api: section(figment, CalendarApiConfig::SECTION)?,
            bootstrap: section(figment, "bootstrap")?,
        })
    }

    /// Effective configuration for `--print-config`. Tokens are counted,
    /// never printed.
    #[must_use]
    pub fn redacted(&self) -> serde_json::Value {
        serde_json::json!({
            "server": self.server,
            "database": self.database,
            "logging": self.logging,
            "access_policy": self.access_policy,
            "calendar_api": {
                "service": self.calendar_api.service,
                "authn": { "tokens": self.calendar_api.authn.tokens.len() },
            },
            "bootstrap": self.bootstrap,
        })
    }
}

fn section<T>(figment: &Figment, key: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned + Default,
{
    if !figment.contains(key) {
        return Ok(T::default());
    }
    figment
        .extract_inner(key)
        .with_context(|| format!("invalid `{key}` configuration"))
}
