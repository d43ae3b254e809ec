/// Configuration management for social-api
///
/// Loads configuration from environment variables once at startup.
use crate::db::QUERY_TIMEOUT;
use anyhow::{anyhow, Context, Result};
use db_pool::env_utils::{parse_env_optional, parse_env_with_default};
use db_pool::DbConfig;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    /// Connection pool settings
    pub database: DbConfig,
    pub request: RequestConfig,
    pub feed: FeedConfig,
    pub self_follow: SelfFollowPolicy,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    pub port: u16,
    /// Public address, used in log output
    pub external_url: String,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RequestConfig {
    /// Bound on every store call
    pub query_timeout: Duration,
    /// Bound on a whole request
    pub request_timeout: Duration,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            query_timeout: QUERY_TIMEOUT,
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 20,
        }
    }
}

/// Whether a user may follow themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfFollowPolicy {
    #[default]
    Allow,
    Reject,
}

impl FromStr for SelfFollowPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(SelfFollowPolicy::Allow),
            "reject" => Ok(SelfFollowPolicy::Reject),
            other => Err(anyhow!(
                "invalid SELF_FOLLOW_POLICY '{}', expected 'allow' or 'reject'",
                other
            )),
        }
    }
}

impl fmt::Display for SelfFollowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelfFollowPolicy::Allow => write!(f, "allow"),
            SelfFollowPolicy::Reject => write!(f, "reject"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_env_with_default("PORT", 8080),
            external_url: std::env::var("EXTERNAL_URL")
                .unwrap_or_else(|_| "localhost:8080".to_string()),
        };

        let database = DbConfig::from_env("social-api").map_err(|e| anyhow!(e))?;

        let defaults = RequestConfig::default();
        let request = RequestConfig {
            query_timeout: Duration::from_secs(
                parse_env_with_default("QUERY_TIMEOUT_SECS", defaults.query_timeout.as_secs())
                    .max(1),
            ),
            request_timeout: Duration::from_secs(
                parse_env_with_default("REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())
                    .max(1),
            ),
        };

        let feed_defaults = FeedConfig::default();
        let max_limit = parse_env_with_default("FEED_MAX_LIMIT", feed_defaults.max_limit).max(1);
        let feed = FeedConfig {
            default_limit: parse_env_with_default("FEED_DEFAULT_LIMIT", feed_defaults.default_limit)
                .clamp(1, max_limit),
            max_limit,
        };

        let self_follow = match parse_env_optional::<String>("SELF_FOLLOW_POLICY") {
            Some(raw) => raw
                .parse()
                .context("SELF_FOLLOW_POLICY environment variable is invalid")?,
            None => SelfFollowPolicy::default(),
        };

        Ok(Config {
            app,
            database,
            request,
            feed,
            self_follow,
        })
    }
}
