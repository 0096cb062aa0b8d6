//! Application configuration
//!
//! Loaded from a TOML file, by default `~/.config/admin-workbench/config.toml`.
//! Every section and field has a default, so a missing file or a partial one
//! is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::identity::DefaultAdmin;
use crate::infrastructure::crypto::JwtConfig;
use crate::infrastructure::{CmsConfig, DatabaseConfig, ESignClientConfig};

/// Environment variable holding an explicit config path
pub const CONFIG_ENV: &str = "ADMIN_WORKBENCH_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub security: SecuritySection,
    pub logging: LoggingSection,
    pub esign: ESignSection,
    pub cms: CmsSection,
    pub workbench: WorkbenchSection,
    pub admin: AdminSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

impl ServerSection {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseSection {
    /// Full connection URL. Takes precedence over `path`.
    pub url: Option<String>,
    /// SQLite file, relative to the working directory
    pub path: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: None,
            path: "./admin-workbench.db".to_string(),
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match self.url.as_deref().filter(|u| !u.is_empty()) {
            Some(url) => url.to_string(),
            None => DatabaseConfig::sqlite(&self.path).url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SecuritySection {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub jwt_issuer: String,
}

impl Default for SecuritySection {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_hours: jwt.expiration_hours,
            jwt_issuer: jwt.issuer,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingSection {
    /// `EnvFilter` directive, `RUST_LOG` wins when set
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ESignSection {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for ESignSection {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9100/api".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CmsSection {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub space: String,
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
}

impl Default for CmsSection {
    fn default() -> Self {
        let cms = CmsConfig::default();
        Self {
            enabled: cms.enabled,
            base_url: cms.base_url,
            api_key: cms.api_key,
            space: cms.space,
            cache_ttl_secs: cms.cache_ttl.as_secs(),
            timeout_secs: cms.timeout.as_secs(),
        }
    }
}

/// Lifetime of mounted workbenches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorkbenchSection {
    /// Unmount after this many seconds without a request
    pub idle_timeout_secs: u64,
    pub sweep_interval_secs: u64,
    /// Oldest workbench of a user is evicted beyond this
    pub max_per_user: usize,
}

impl Default for WorkbenchSection {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 1800,
            sweep_interval_secs: 60,
            max_per_user: 8,
        }
    }
}

/// Account seeded when the users table is empty
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdminSection {
    pub tenant_id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Default for AdminSection {
    fn default() -> Self {
        Self {
            tenant_id: "default".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
            name: "Administrator".to_string(),
        }
    }
}

/// `$ADMIN_WORKBENCH_CONFIG`, else `~/.config/admin-workbench/config.toml`
pub fn default_config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("admin-workbench")
        .join("config.toml")
}

impl AppConfig {
    /// Read `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, raw).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.security.jwt_secret.len() < 16 {
            return Err(ConfigError::Invalid(
                "security.jwt_secret must be at least 16 characters".into(),
            ));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if self.workbench.max_per_user == 0 || self.workbench.sweep_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "workbench.max_per_user and workbench.sweep_interval_secs must be positive".into(),
            ));
        }
        if self.cms.enabled && (self.cms.base_url.is_empty() || self.cms.api_key.is_empty()) {
            return Err(ConfigError::Invalid(
                "cms.enabled requires cms.base_url and cms.api_key".into(),
            ));
        }
        Ok(())
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            issuer: self.security.jwt_issuer.clone(),
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.connection_url(),
        }
    }

    pub fn esign_config(&self) -> ESignClientConfig {
        ESignClientConfig {
            base_url: self.esign.base_url.clone(),
            api_key: self.esign.api_key.clone(),
            timeout: Duration::from_secs(self.esign.timeout_secs),
        }
    }

    pub fn cms_config(&self) -> CmsConfig {
        CmsConfig {
            enabled: self.cms.enabled,
            base_url: self.cms.base_url.clone(),
            api_key: self.cms.api_key.clone(),
            space: self.cms.space.clone(),
            cache_ttl: Duration::from_secs(self.cms.cache_ttl_secs),
            timeout: Duration::from_secs(self.cms.timeout_secs),
        }
    }

    pub fn default_admin(&self) -> DefaultAdmin {
        DefaultAdmin {
            tenant_id: self.admin.tenant_id.clone(),
            email: self.admin.email.clone(),
            password: self.admin.password.clone(),
            name: self.admin.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [cms]
            enabled = true
            base_url = "https://cms.example.com/api"
            api_key = "key"
            space = "admin"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cms_config().cache_ttl, Duration::from_secs(300));
        assert_eq!(config.workbench.idle_timeout_secs, 1800);
        assert_eq!(config.workbench.max_per_user, 8);
        assert!(config.cms_config().is_usable());
    }

    #[test]
    fn database_url_falls_back_to_sqlite_path() {
        let mut section = DatabaseSection::default();
        assert_eq!(section.connection_url(), "sqlite://./admin-workbench.db?mode=rwc");
        section.url = Some("postgres://db/admin".into());
        assert_eq!(section.connection_url(), "postgres://db/admin");
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("admin-workbench-missing-config.toml");
        let _ = std::fs::remove_file(&path);
        assert_eq!(AppConfig::load(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir()
            .join(format!("admin-workbench-{}", uuid::Uuid::new_v4()))
            .join("config.toml");
        let mut config = AppConfig::default();
        config.server.port = 7070;
        config.logging.format = "json".into();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn validate_rejects_unusable_cms_and_weak_secret() {
        let mut config = AppConfig::default();
        config.security.jwt_secret = "short".into();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.cms.enabled = true;
        assert!(config.validate().is_err());

        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let path = std::env::temp_dir().join(format!("admin-workbench-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[server\nport = ").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
        let _ = std::fs::remove_file(&path);
    }
}
