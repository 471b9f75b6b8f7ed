//! Raw config types matching `config.json`.

use serde::Deserialize;
use std::fmt;

#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the structured fields when set.
    #[serde(skip)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
    pub sslmode: String,
    pub max_open_conns: u32,
    pub max_idle_conns: u32,
    #[serde(alias = "maxConnLifetime")]
    pub max_conn_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: None,
            host: "localhost".into(),
            port: 5432,
            user: "postgres".into(),
            password: String::new(),
            dbname: "riddles".into(),
            sslmode: "prefer".into(),
            max_open_conns: 10,
            max_idle_conns: 2,
            max_conn_lifetime_secs: 1800,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("sslmode", &self.sslmode)
            .field("max_open_conns", &self.max_open_conns)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_conn_lifetime_secs", &self.max_conn_lifetime_secs)
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("invalid log format: {s} (expected pretty or json)")),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server_port: String,
    /// Prefix for link hrefs. Empty means derive from the request's Host header.
    pub base_url: String,
    #[serde(rename = "allowedIPs")]
    pub allowed_ips: Vec<String>,
    pub shutdown_grace_secs: u64,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database: DatabaseConfig::default(),
            server_port: "8080".into(),
            base_url: String::new(),
            allowed_ips: Vec::new(),
            shutdown_grace_secs: 5,
            log_format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Configured base URL without a trailing slash, or None when unset.
    pub fn base_url(&self) -> Option<&str> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        (!trimmed.is_empty()).then_some(trimmed)
    }
}
