use serde::{Deserialize, Serialize};

/// Client configuration.
///
/// Example YAML:
/// ```yaml
/// server:
///   base_url: "http://tennis.club.example:8081"
/// username: admin
/// auto_refresh_interval: 120
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    /// Default account for write operations; the password is never stored.
    #[serde(default)]
    pub username: Option<String>,

    /// TUI auto-refresh interval in seconds.
    #[serde(default = "default_refresh_interval")]
    pub auto_refresh_interval: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

pub fn default_base_url() -> String {
    // The port the club API serves on out of the box.
    "http://localhost:8081".to_string()
}

fn default_refresh_interval() -> u64 {
    300
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            username: None,
            auto_refresh_interval: default_refresh_interval(),
        }
    }
}
