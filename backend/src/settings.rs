//! Application settings loaded via OrthoConfig.
//!
//! Values come from `COFFEE_CHAT_*` environment variables, CLI flags and an
//! optional config file. Everything except the database URL and the auth
//! service details has a default.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SITE_URL: &str = "http://localhost:3000";
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// A setting is missing or malformed.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting: {name}")]
    Missing { name: &'static str },
    #[error("invalid URL for {name}='{value}': {source}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Process-wide settings.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COFFEE_CHAT")]
pub struct AppSettings {
    /// Postgres connection string.
    pub database_url: Option<String>,
    /// Listen address, e.g. `0.0.0.0:8080`.
    pub bind_addr: Option<String>,
    /// Base URL of the hosted auth service.
    pub auth_url: Option<String>,
    /// Public API key sent to the auth service.
    pub auth_api_key: Option<String>,
    /// Front-end origin used for email and OAuth redirects.
    pub site_url: Option<String>,
    /// Timeout for auth service requests.
    pub auth_timeout_secs: Option<u64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("bind_addr", &self.bind_addr)
            .field("auth_url", &self.auth_url)
            .field("site_url", &self.site_url)
            .field("auth_timeout_secs", &self.auth_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .finish_non_exhaustive()
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, SettingsError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(SettingsError::Missing { name })
}

fn parse_url(value: &str, name: &'static str) -> Result<Url, SettingsError> {
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        name,
        value: value.to_owned(),
        source,
    })
}

impl AppSettings {
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        required(self.database_url.as_deref(), "database_url")
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: raw.to_owned(),
                source,
            })
    }

    pub fn auth_url(&self) -> Result<Url, SettingsError> {
        parse_url(required(self.auth_url.as_deref(), "auth_url")?, "auth_url")
    }

    pub fn auth_api_key(&self) -> Result<&str, SettingsError> {
        required(self.auth_api_key.as_deref(), "auth_api_key")
    }

    /// Where confirmation, recovery and OAuth flows send the browser back.
    pub fn site_url(&self) -> Result<Url, SettingsError> {
        parse_url(
            self.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL),
            "site_url",
        )
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(
            self.auth_timeout_secs
                .unwrap_or(DEFAULT_AUTH_TIMEOUT_SECS)
                .max(1),
        )
    }

    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
