//! Configuration module for payapp-server.
//!
//! Handles loading configuration from TOML files, CLI arguments,
//! and environment variables.

pub mod file;

use crate::config::file::FileConfig;
use payapp_sdk::Credentials;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line or through the environment.
/// They take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub listen: Option<SocketAddr>,
    pub userid: Option<String>,
    pub linkkey: Option<String>,
    pub linkval: Option<String>,
}

/// Validated configuration ready to build the server from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub webhook_path: String,
    pub credentials: Credentials,
    /// `None` when periodic clearing is disabled.
    pub dedup_clear_interval: Option<Duration>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file (a missing file means all defaults)
    /// 2. Apply CLI and environment overrides
    /// 3. Validate the result
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    path = %self.config_path.display(),
                    "Config file not found, using defaults and overrides"
                );
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };

        self.apply_overrides(&mut file_config);
        validate(&file_config)?;
        Ok(build_loaded_config(file_config))
    }

    fn apply_overrides(&self, config: &mut FileConfig) {
        if let Some(listen) = self.overrides.listen {
            config.server.listen = listen;
        }
        if let Some(userid) = &self.overrides.userid {
            config.payapp.userid = userid.clone();
        }
        if let Some(linkkey) = &self.overrides.linkkey {
            config.payapp.linkkey = linkkey.clone();
        }
        if let Some(linkval) = &self.overrides.linkval {
            config.payapp.linkval = linkval.clone();
        }
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    for (name, value) in [
        ("userid", &config.payapp.userid),
        ("linkkey", &config.payapp.linkkey),
        ("linkval", &config.payapp.linkval),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "payapp.{name} must not be empty"
            )));
        }
    }
    if !config.server.webhook_path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "server.webhook_path must start with '/': {:?}",
            config.server.webhook_path
        )));
    }
    Ok(())
}

fn build_loaded_config(file_config: FileConfig) -> LoadedConfig {
    let FileConfig {
        server,
        payapp,
        dedup,
    } = file_config;

    LoadedConfig {
        listen: server.listen,
        webhook_path: server.webhook_path,
        credentials: Credentials::new(payapp.userid, payapp.linkkey, payapp.linkval),
        dedup_clear_interval: (dedup.clear_interval_secs > 0)
            .then(|| Duration::from_secs(dedup.clear_interval_secs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "payapp-server-{}-{name}.toml",
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_with_overrides() {
        let path = write_config(
            "overrides",
            r#"
[server]
listen = "127.0.0.1:3000"

[payapp]
userid = "from-file"
linkkey = "file-key"
linkval = "file-val"

[dedup]
clear_interval_secs = 60
"#,
        );
        let loader = ConfigLoader::new(
            &path,
            Overrides {
                listen: Some("127.0.0.1:4000".parse().unwrap()),
                linkkey: Some("env-key".into()),
                ..Overrides::default()
            },
        );
        let loaded = loader.load().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.listen.port(), 4000);
        assert_eq!(loaded.webhook_path, "/payapp/feedback");
        assert_eq!(loaded.credentials.userid(), "from-file");
        assert!(loaded.credentials.matches("from-file", "env-key", "file-val"));
        assert_eq!(loaded.dedup_clear_interval, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_missing_file_uses_overrides() {
        let loader = ConfigLoader::new(
            std::env::temp_dir().join("payapp-server-does-not-exist.toml"),
            Overrides {
                userid: Some("merchant".into()),
                linkkey: Some("key".into()),
                linkval: Some("val".into()),
                ..Overrides::default()
            },
        );
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.listen.port(), 8080);
        assert_eq!(loaded.dedup_clear_interval, Some(Duration::from_secs(86_400)));
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let loader = ConfigLoader::new(
            std::env::temp_dir().join("payapp-server-does-not-exist.toml"),
            Overrides {
                userid: Some("merchant".into()),
                linkkey: Some("key".into()),
                ..Overrides::default()
            },
        );
        let err = loader.load().unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(ref msg) if msg.contains("linkval")));
    }

    #[test]
    fn test_relative_webhook_path_rejected() {
        let path = write_config(
            "relative-path",
            r#"
[server]
webhook_path = "payapp/feedback"

[payapp]
userid = "merchant"
linkkey = "key"
linkval = "val"
"#,
        );
        let err = ConfigLoader::new(&path, Overrides::default()).load().unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_zero_interval_disables_clearing() {
        let path = write_config(
            "zero-interval",
            "[payapp]\nuserid = \"m\"\nlinkkey = \"k\"\nlinkval = \"v\"\n[dedup]\nclear_interval_secs = 0\n",
        );
        let loaded = ConfigLoader::new(&path, Overrides::default()).load().unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.dedup_clear_interval, None);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let path = write_config("malformed", "[server\nlisten = ");
        let err = ConfigLoader::new(&path, Overrides::default()).load().unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }
}
