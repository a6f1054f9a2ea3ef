//! Application configuration loaded from a YAML file with env overrides.

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::backend::domain::email_service::EmailConfig;
use crate::backend::domain::proximity::DEFAULT_UPCOMING_THRESHOLD_DAYS;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// A birthday within this many days counts as upcoming
    pub threshold_days: i64,
    /// Seconds between sweep runs
    pub interval_secs: u64,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            threshold_days: DEFAULT_UPCOMING_THRESHOLD_DAYS,
            interval_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    /// Directory holding users.yaml and the per-group data directories
    pub data_directory: Option<PathBuf>,
    pub sweep: SweepConfig,
    pub email: EmailConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist. Environment variables override file values.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            info!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("BIRTHDAY_TRACKER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("BIRTHDAY_TRACKER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(dir) = std::env::var("BIRTHDAY_TRACKER_DATA_DIR") {
            self.data_directory = Some(PathBuf::from(dir));
        }
        if let Ok(username) = std::env::var("SMTP_USERNAME") {
            self.email.username = username;
        }
        if let Ok(password) = std::env::var("SMTP_PASSWORD") {
            self.email.password = password;
        }
        if let Ok(from) = std::env::var("SMTP_FROM_EMAIL") {
            self.email.from_email = from;
        }
    }

    /// The data directory to use, defaulting to ./data
    pub fn resolved_data_directory(&self) -> PathBuf {
        self.data_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_file_missing() {
        let temp_dir = tempdir().unwrap();
        let config = AppConfig::load(&temp_dir.path().join("missing.yaml")).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sweep.threshold_days, 7);
        assert!(!config.email.is_configured());
    }

    #[test]
    fn test_load_from_yaml() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "server:\n  port: 8081\nsweep:\n  threshold_days: 14\n",
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.sweep.threshold_days, 14);
        assert_eq!(config.server.host, "127.0.0.1");
    }
}
