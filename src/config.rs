use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default = "default_poll_config")]
    pub poll: PollConfig,
    #[serde(default = "default_menu_config")]
    pub menu: MenuConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Base URL of the imitation backend, e.g. "http://127.0.0.1:5000"
    pub base_url: String,
}

impl ServerConfig {
    /// Base URL without a trailing slash, ready for `format!("{}/getUpdates", ..)`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Optional upper bound for a single getUpdates round-trip
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuConfig {
    #[serde(default = "default_hidden_label")]
    pub hidden_label: String,
    #[serde(default = "default_shown_label")]
    pub shown_label: String,
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_hidden_label() -> String {
    "/ menu".to_string()
}

fn default_shown_label() -> String {
    "× menu".to_string()
}

fn default_poll_config() -> PollConfig {
    PollConfig {
        interval_ms: default_interval_ms(),
        request_timeout_ms: None,
    }
}

fn default_menu_config() -> MenuConfig {
    MenuConfig {
        hidden_label: default_hidden_label(),
        shown_label: default_shown_label(),
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        default_menu_config()
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;

        if config.server.base_url.trim().is_empty() {
            anyhow::bail!("server.base_url must not be empty");
        }
        if config.poll.interval_ms == 0 {
            anyhow::bail!("poll.interval_ms must be greater than zero");
        }

        Ok(config)
    }
}
