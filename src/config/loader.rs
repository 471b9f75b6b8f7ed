//! Load config from a JSON file, then apply environment overrides.

use crate::config::AppConfig;
use crate::error::ConfigError;
use std::path::Path;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Read `path` and apply env overrides. A missing file is only accepted when
/// `DATABASE_URL` supplies the connection.
/// Callers run [`validate`](crate::config::validate) once logging is up.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    load_with(path, |key| std::env::var(key).ok())
}

fn load_with<F>(path: &Path, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if path.exists() {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Load(format!("{}: {e}", path.display())))?;
        from_json(&text)?
    } else if lookup("DATABASE_URL").is_some_and(|url| !url.is_empty()) {
        AppConfig::default()
    } else {
        return Err(ConfigError::Load(format!(
            "{}: file not found and DATABASE_URL is not set",
            path.display()
        )));
    };
    apply_overrides(&mut config, lookup)?;
    Ok(config)
}

pub fn from_json(text: &str) -> Result<AppConfig, ConfigError> {
    Ok(serde_json::from_str(text)?)
}

/// Overlay values from `lookup` (the process environment in production).
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
        config.database.url = Some(url);
    }
    if let Some(port) = lookup("SERVER_PORT") {
        config.server_port = port;
    }
    if let Some(base) = lookup("BASE_URL") {
        config.base_url = base;
    }
    if let Some(ips) = lookup("ALLOWED_IPS") {
        config.allowed_ips = ips
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    if let Some(grace) = lookup("SHUTDOWN_GRACE_SECS") {
        config.shutdown_grace_secs = grace
            .parse()
            .map_err(|_| ConfigError::Validation(format!("invalid SHUTDOWN_GRACE_SECS: {grace}")))?;
    }
    if let Some(format) = lookup("LOG_FORMAT") {
        config.log_format = format.parse().map_err(ConfigError::Validation)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::collections::HashMap;

    const SAMPLE: &str = r#"{
        "database": {
            "host": "db.internal",
            "port": 5433,
            "user": "riddler",
            "password": "hunter2",
            "dbname": "riddles",
            "sslmode": "disable",
            "maxOpenConns": 20,
            "maxIdleConns": 5,
            "maxConnLifetime": 600
        },
        "serverPort": "9000",
        "baseUrl": "https://riddles.example.com/",
        "allowedIPs": ["127.0.0.1", "10.0.0.7"]
    }"#;

    #[test]
    fn parses_file_layout() {
        let config = from_json(SAMPLE).expect("valid config");
        assert_eq!(config.database.port, 5433);
        assert_eq!(config.database.max_conn_lifetime_secs, 600);
        assert_eq!(config.server_port, "9000");
        assert_eq!(config.base_url(), Some("https://riddles.example.com"));
        assert_eq!(config.allowed_ips, vec!["127.0.0.1", "10.0.0.7"]);
        assert_eq!(config.shutdown_grace_secs, 5);
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = from_json(SAMPLE).expect("valid config");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let mut config = from_json(SAMPLE).expect("valid config");
        let env: HashMap<&str, &str> = [
            ("ALLOWED_IPS", " 192.168.1.4 , ,::1"),
            ("SERVER_PORT", "8081"),
            ("LOG_FORMAT", "json"),
            ("DATABASE_URL", "postgres://u@h/db"),
        ]
        .into_iter()
        .collect();
        apply_overrides(&mut config, |k| env.get(k).map(|v| v.to_string())).expect("overrides");
        assert_eq!(config.allowed_ips, vec!["192.168.1.4", "::1"]);
        assert_eq!(config.server_port, "8081");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.database.url.as_deref(), Some("postgres://u@h/db"));
    }

    #[test]
    fn missing_file_without_database_url_is_fatal() {
        let path = Path::new("/nonexistent/riddles/config.json");
        let err = load_with(path, |_| None).expect_err("must fail");
        assert!(matches!(err, ConfigError::Load(m) if m.contains("DATABASE_URL")));
    }

    #[test]
    fn missing_file_falls_back_to_database_url() {
        let path = Path::new("/nonexistent/riddles/config.json");
        let config = load_with(path, |k| {
            (k == "DATABASE_URL").then(|| "postgres://u@db.example/riddles".to_string())
        })
        .expect("env supplies the database");
        assert_eq!(config.database.url.as_deref(), Some("postgres://u@db.example/riddles"));
        assert!(config.allowed_ips.is_empty());
    }

    #[test]
    fn bad_override_is_reported() {
        let mut config = AppConfig::default();
        let err = apply_overrides(&mut config, |k| {
            (k == "SHUTDOWN_GRACE_SECS").then(|| "soon".to_string())
        })
        .expect_err("must fail");
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
