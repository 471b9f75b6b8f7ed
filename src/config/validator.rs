//! Validate a loaded config before the server starts.

use crate::config::AppConfig;
use crate::error::ConfigError;
use std::net::IpAddr;

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .server_port
        .parse::<u16>()
        .map_err(|_| ConfigError::Validation(format!("invalid server port: {}", config.server_port)))?;

    if let Some(base) = config.base_url() {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "base url must start with http:// or https://: {base}"
            )));
        }
    }

    for ip in &config.allowed_ips {
        if ip.trim().is_empty() {
            return Err(ConfigError::Validation("allow-list entries must not be blank".into()));
        }
        // Matching is exact-string against the peer IP, so anything else never admits.
        if ip.parse::<IpAddr>().is_err() {
            tracing::warn!(entry = %ip, "allow-list entry is not an IP address and will never match");
        }
    }

    if config.database.max_open_conns == 0 {
        return Err(ConfigError::Validation("database.maxOpenConns must be at least 1".into()));
    }
    Ok(())
}
