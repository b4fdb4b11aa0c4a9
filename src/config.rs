//! Application configuration
//!
//! Loaded from a TOML file (default `<config_dir>/dealership/config.toml`,
//! or the path in `DEALERSHIP_CONFIG`). Every section and field is optional;
//! missing values fall back to the defaults below. A handful of secrets and
//! paths can be overridden from the environment.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::{JwtConfig, DEFAULT_ISSUER};
use crate::infrastructure::database::DatabaseConfig;

pub const CONFIG_PATH_ENV: &str = "DEALERSHIP_CONFIG";

/// Upper bound for token lifetimes (ten years).
pub const MAX_TOKEN_HOURS: i64 = 87_600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// `<config_dir>/dealership/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("dealership").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

/// `DEALERSHIP_CONFIG` if set, else [`default_config_path`].
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_config_path())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub mail: MailConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    /// 0 binds a free port
    pub api_port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            shutdown_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Lifetime of the link in activation emails
    pub activation_token_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            activation_token_hours: 72,
        }
    }
}

/// Administrator created on first start when the users table is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@dealership.local".to_string(),
            password: "admin12345".to_string(),
            first_name: "Beheerder".to_string(),
            last_name: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Provider endpoint accepting `{from, to, subject, text, html}`
    pub api_url: String,
    /// Without a key, outgoing mail is only logged
    pub api_key: Option<String>,
    pub from: String,
    /// Base of links in emails, e.g. `https://www.dealer.nl`
    pub public_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.resend.com/emails".to_string(),
            api_key: None,
            from: "Dealership <noreply@dealership.local>".to_string(),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    /// URL prefix the upload directory is served under
    pub public_path: String,
    pub max_upload_mb: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            public_path: "/uploads".to_string(),
            max_upload_mb: 100,
        }
    }
}

impl StorageConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl AppConfig {
    /// Read the file, apply environment overrides and validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut cfg = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`load`](Self::load), but a missing file yields the defaults
    /// (still with environment overrides).
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::load(path);
        }
        let mut cfg = Self::default();
        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Overrides from `DATABASE_URL`, `JWT_SECRET`, `JWT_EXPIRATION_HOURS`,
    /// `MAIL_API_KEY` and `UPLOAD_DIR`. Empty or unparsable values are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = get("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(hours) = get("JWT_EXPIRATION_HOURS").and_then(|v| v.trim().parse().ok()) {
            self.security.jwt_expiration_hours = hours;
        }
        if let Some(key) = get("MAIL_API_KEY") {
            self.mail.api_key = Some(key);
        }
        if let Some(dir) = get("UPLOAD_DIR") {
            self.storage.upload_dir = PathBuf::from(dir);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.database.url.trim().is_empty() {
            return invalid("database.url is empty; set it in the config file or DATABASE_URL");
        }
        if self.security.jwt_secret.trim().is_empty() {
            return invalid("security.jwt_secret must not be empty");
        }
        if !(1..=MAX_TOKEN_HOURS).contains(&self.security.jwt_expiration_hours) {
            return invalid("security.jwt_expiration_hours must be between 1 and 87600");
        }
        if !(1..=MAX_TOKEN_HOURS).contains(&self.security.activation_token_hours) {
            return invalid("security.activation_token_hours must be between 1 and 87600");
        }
        if self.storage.public_path.trim_matches('/').is_empty() {
            return invalid("storage.public_path must not be the site root");
        }
        if self.storage.max_upload_mb == 0 {
            return invalid("storage.max_upload_mb must be at least 1");
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }

    /// The mail API key, if one is configured and non-blank.
    pub fn mail_api_key(&self) -> Option<&str> {
        self.mail
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 3000);
        assert_eq!(cfg.security.activation_token_hours, 72);
        assert_eq!(cfg.storage.public_path, "/uploads");
        assert!(cfg.mail_api_key().is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 8080

            [mail]
            api_key = "re_123"
            public_base_url = "https://www.dealer.nl"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.mail_api_key(), Some("re_123"));
        assert_eq!(cfg.mail.public_base_url, "https://www.dealer.nl");
        assert!(cfg.logging.is_json());
        assert_eq!(cfg.storage.max_upload_bytes(), 100 * 1024 * 1024);
    }

    #[test]
    fn environment_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite://./other.db?mode=rwc"),
            ("JWT_SECRET", "from-env"),
            ("JWT_EXPIRATION_HOURS", "2"),
            ("MAIL_API_KEY", "key"),
            ("UPLOAD_DIR", "/srv/media"),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        cfg.apply_overrides_from(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.database.url, "sqlite://./other.db?mode=rwc");
        assert_eq!(cfg.jwt_config().secret, "from-env");
        assert_eq!(cfg.jwt_config().expiration_hours, 2);
        assert_eq!(cfg.mail_api_key(), Some("key"));
        assert_eq!(cfg.storage.upload_dir, PathBuf::from("/srv/media"));
    }

    #[test]
    fn blank_or_garbage_overrides_are_ignored() {
        let mut cfg = AppConfig::default();
        cfg.apply_overrides_from(|k| match k {
            "JWT_SECRET" => Some("  ".to_string()),
            "JWT_EXPIRATION_HOURS" => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(cfg.security.jwt_secret, SecurityConfig::default().jwt_secret);
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
    }

    #[test]
    fn root_public_path_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.storage.public_path = "/".to_string();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn token_lifetimes_are_bounded() {
        let mut cfg = AppConfig::default();
        cfg.security.jwt_expiration_hours = i64::MAX / 1000;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.security.activation_token_hours = MAX_TOKEN_HOURS + 1;
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.security.jwt_expiration_hours = MAX_TOKEN_HOURS;
        cfg.security.activation_token_hours = MAX_TOKEN_HOURS;
        cfg.validate().unwrap();
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = std::env::temp_dir().join(format!("dealership-cfg-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[server\napi_port = ").unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
