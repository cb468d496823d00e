//! TOML file configuration structures.
//!
//! These structs directly map to the `payapp-config.toml` file format.

use serde::{Deserialize, Serialize};
use std::net::{Ipv4Addr, SocketAddr};

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    /// May be omitted when the credentials come from the environment.
    #[serde(default)]
    pub payapp: PayAppConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
    /// Path PayApp posts feedback to.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
            webhook_path: default_webhook_path(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8080))
}

fn default_webhook_path() -> String {
    "/payapp/feedback".to_string()
}

/// Merchant credentials issued by PayApp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayAppConfig {
    #[serde(default)]
    pub userid: String,
    #[serde(default)]
    pub linkkey: String,
    #[serde(default)]
    pub linkval: String,
}

/// In-memory dedup store maintenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Seconds between full clears of the dedup store. 0 disables clearing.
    #[serde(default = "default_clear_interval")]
    pub clear_interval_secs: u64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            clear_interval_secs: default_clear_interval(),
        }
    }
}

fn default_clear_interval() -> u64 {
    86_400
}
