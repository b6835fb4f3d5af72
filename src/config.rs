use std::path::Path;
use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Config file picked up from the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Upper bound for identity cookie lifetime (30 days).
const MAX_SESSION_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Upper bound for chat session inactivity (7 days).
const MAX_IDLE_TIMEOUT_MINUTES: u64 = 7 * 24 * 60;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Base URL of the document backend
    #[arg(long, env = "BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Secret used to sign identity cookies
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON")]
    pub log_json: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub auth: AuthConfig,
    pub sessions: SessionsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub session_ttl_minutes: i64,
    pub secure_cookies: bool,
}

impl AuthConfig {
    #[must_use]
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::try_minutes(self.session_ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES))
            .unwrap_or_else(|| chrono::Duration::minutes(MAX_SESSION_TTL_MINUTES))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionsConfig {
    pub idle_timeout_minutes: u64,
    pub cleanup_interval_secs: u64,
}

impl SessionsConfig {
    #[must_use]
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_minutes.saturating_mul(60))
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub filter: String,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder();

        // 1. Defaults
        builder = builder
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.static_dir", "static")?
            .set_default("backend.base_url", "http://127.0.0.1:5001")?
            .set_default("auth.session_ttl_minutes", 8 * 60)?
            .set_default("auth.secure_cookies", false)?
            .set_default("sessions.idle_timeout_minutes", 30)?
            .set_default("sessions.cleanup_interval_secs", 60)?
            .set_default("logging.format", "pretty")?
            .set_default("logging.filter", "docdesk=info,tower_http=info")?;

        // 2. Config file: explicit path must exist, ./config.yaml is optional
        match &cli.config {
            Some(path) => {
                builder = builder.add_source(File::with_name(path).required(true));
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                builder = builder.add_source(File::with_name(DEFAULT_CONFIG_FILE));
            }
            None => {}
        }

        // 3. Environment variables, e.g. DOCDESK_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("DOCDESK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // 4. CLI flags (and their env fallbacks) win
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.backend_url {
            builder = builder.set_override("backend.base_url", url)?;
        }
        if let Some(secret) = cli.jwt_secret {
            builder = builder.set_override("auth.jwt_secret", secret)?;
        }
        if let Some(json) = cli.log_json {
            builder = builder.set_override("logging.format", if json { "json" } else { "pretty" })?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "auth.jwt_secret cannot be empty".to_string(),
            ));
        }
        if !(1..=MAX_SESSION_TTL_MINUTES).contains(&self.auth.session_ttl_minutes) {
            return Err(config::ConfigError::Message(format!(
                "auth.session_ttl_minutes must be between 1 and {MAX_SESSION_TTL_MINUTES}"
            )));
        }
        if self.sessions.idle_timeout_minutes > MAX_IDLE_TIMEOUT_MINUTES {
            return Err(config::ConfigError::Message(format!(
                "sessions.idle_timeout_minutes must be at most {MAX_IDLE_TIMEOUT_MINUTES}"
            )));
        }
        url::Url::parse(&self.backend.base_url).map_err(|e| {
            config::ConfigError::Message(format!("backend.base_url is not a valid URL: {e}"))
        })?;
        Ok(())
    }

    /// Socket address string for the listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_defaults() {
        let cfg = AppConfig::load_from_args([
            "docdesk",
            "--jwt-secret",
            "unit-secret",
            "--port",
            "4100",
            "--backend-url",
            "http://backend.internal:9000",
            "--log-json",
            "true",
        ])
        .unwrap();
        assert_eq!(cfg.server.port, 4100);
        assert_eq!(cfg.backend.base_url, "http://backend.internal:9000");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.bind_addr(), "0.0.0.0:4100");
    }

    #[test]
    fn test_invalid_backend_url_rejected() {
        let err = AppConfig::load_from_args([
            "docdesk",
            "--jwt-secret",
            "unit-secret",
            "--backend-url",
            "not a url",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("backend.base_url"));
    }

    #[test]
    fn test_blank_secret_rejected() {
        let err = AppConfig::load_from_args(["docdesk", "--jwt-secret", "  "]).unwrap_err();
        assert!(err.to_string().contains("auth.jwt_secret"));
    }

    #[test]
    fn test_lifetimes_are_bounded() {
        let mut cfg = AppConfig::load_from_args(["docdesk", "--jwt-secret", "unit-secret"]).unwrap();
        cfg.auth.session_ttl_minutes = i64::MAX;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("auth.session_ttl_minutes"));
        assert_eq!(
            cfg.auth.session_ttl(),
            chrono::Duration::minutes(MAX_SESSION_TTL_MINUTES)
        );

        cfg.auth.session_ttl_minutes = 60;
        cfg.sessions.idle_timeout_minutes = u64::MAX;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("sessions.idle_timeout_minutes"));
        assert_eq!(cfg.sessions.idle_timeout(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_durations() {
        let sessions = SessionsConfig {
            idle_timeout_minutes: 30,
            cleanup_interval_secs: 0,
        };
        assert_eq!(sessions.idle_timeout(), Duration::from_secs(1800));
        assert_eq!(sessions.cleanup_interval(), Duration::from_secs(1));
    }
}
