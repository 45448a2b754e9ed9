//! Environment-driven service configuration.
//!
//! All credentials and endpoints are read once at startup into a [`Config`]
//! and handed to the pipeline; request handling never touches ambient
//! environment state. Startup fails fast when a required value is missing.

use std::env;

use anyhow::{bail, Result};

const ENV_JIRA_URL: &str = "JIRA_URL";
const ENV_JIRA_EMAIL: &str = "JIRA_EMAIL";
const ENV_JIRA_API_TOKEN: &str = "JIRA_API_TOKEN";
const ENV_JIRA_PROJECT_KEY: &str = "JIRA_PROJECT_KEY";
const ENV_JIRA_PROJECT_ID: &str = "JIRA_PROJECT_ID";
const ENV_JIRA_ISSUE_TYPE: &str = "JIRA_ISSUE_TYPE";
const ENV_WEBEX_ACCESS_TOKEN: &str = "WEBEX_ACCESS_TOKEN";
const ENV_WEBEX_ROOM_ID: &str = "WEBEX_ROOM_ID";
const ENV_WEBEX_API_URL: &str = "WEBEX_API_URL";
const ENV_LOG_STORE_URL: &str = "LOG_STORE_URL";
const ENV_LOG_STORE_BUCKET: &str = "LOG_STORE_BUCKET";
const ENV_LOG_STORE_PREFIX: &str = "LOG_STORE_PREFIX";
const ENV_LOG_STORE_TOKEN: &str = "LOG_STORE_TOKEN";
const ENV_RELAY_PORT: &str = "RELAY_PORT";

/// Default HTTP listen port.
const DEFAULT_PORT: u16 = 8080;

/// Relay service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    /// Ticket tracker settings
    pub jira: JiraConfig,
    /// Chat notification settings
    pub webex: WebexConfig,
    /// Audit log store settings
    pub log_store: LogStoreConfig,
}

/// Ticket tracker settings.
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Instance base URL (e.g. `https://example.atlassian.net`)
    pub base_url: String,
    /// Account email for basic auth
    pub email: String,
    /// API token for basic auth
    pub api_token: String,
    /// Project key (e.g. `OPS`)
    pub project_key: String,
    /// Numeric project id carried in create requests
    pub project_id: String,
    /// Issue type name for incident tickets
    pub issue_type: String,
}

/// Chat notification settings.
#[derive(Debug, Clone)]
pub struct WebexConfig {
    /// Bot access token
    pub access_token: String,
    /// Target room id
    pub room_id: String,
    /// API base override for tests and private deployments
    pub api_url: Option<String>,
}

/// Audit log store settings.
#[derive(Debug, Clone)]
pub struct LogStoreConfig {
    /// Object store endpoint
    pub url: String,
    /// Bucket name
    pub bucket: String,
    /// Key prefix for audit objects
    pub prefix: String,
    /// Optional bearer token
    pub token: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing required variable. The
    /// service must not start on a partial configuration.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            port: env::var(ENV_RELAY_PORT)
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            jira: JiraConfig {
                base_url: require(ENV_JIRA_URL)?,
                email: require(ENV_JIRA_EMAIL)?,
                api_token: require(ENV_JIRA_API_TOKEN)?,
                project_key: require(ENV_JIRA_PROJECT_KEY)?,
                project_id: require(ENV_JIRA_PROJECT_ID)?,
                issue_type: require(ENV_JIRA_ISSUE_TYPE)?,
            },
            webex: WebexConfig {
                access_token: require(ENV_WEBEX_ACCESS_TOKEN)?,
                room_id: require(ENV_WEBEX_ROOM_ID)?,
                api_url: optional(ENV_WEBEX_API_URL),
            },
            log_store: LogStoreConfig {
                url: require(ENV_LOG_STORE_URL)?,
                bucket: require(ENV_LOG_STORE_BUCKET)?,
                prefix: require(ENV_LOG_STORE_PREFIX)?,
                token: optional(ENV_LOG_STORE_TOKEN),
            },
        })
    }
}

/// Read a required variable, rejecting unset and blank values.
fn require(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => bail!("{name} is not set"),
    }
}

/// Read an optional variable, treating blank as unset.
fn optional(name: &'static str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
