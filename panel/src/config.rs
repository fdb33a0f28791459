//! Configuration management.
//!
//! Sources in priority order (later wins): built-in defaults, the user
//! config file, a local `.slate.toml`, `SLATE_*` environment variables,
//! CLI arguments.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    slate_types::DEFAULT_PORT
}

/// On-disk configuration schema.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    obs: ObsConfig,
    #[serde(default)]
    logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObsConfig {
    /// Host the obs-websocket server listens on
    #[serde(default = "default_host")]
    host: String,
    /// Port of the obs-websocket server
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ObsConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct LoggingConfig {
    /// Log level filter, e.g. "info" or "slate=debug"
    log_level: Option<String>,
}

/// Resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration from all sources, with CLI arguments taking the
    /// highest priority.
    pub fn from_figment(host: Option<String>, port: Option<u16>) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(ConfigFile::default()));

        if let Some(dirs) = directories::ProjectDirs::from("", "", "slate") {
            let user_config = dirs.config_dir().join("config.toml");
            if user_config.exists() {
                figment = figment.merge(Toml::file(user_config));
            }
        }

        let local_config = std::path::Path::new(".slate.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(local_config));
        }

        figment = figment.merge(
            Env::prefixed("SLATE_")
                .map(|key| key.as_str().replace("__", ".").into())
                .split("_"),
        );

        if let Some(host) = host {
            figment = figment.merge(Serialized::default("obs.host", host));
        }
        if let Some(port) = port {
            figment = figment.merge(Serialized::default("obs.port", port));
        }

        let file: ConfigFile = figment.extract()?;
        Ok(Self {
            host: file.obs.host,
            port: file.obs.port,
            log_level: file.logging.log_level,
        })
    }

    /// WebSocket URL of the configured OBS instance.
    pub fn url(&self) -> String {
        format!("ws://{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: None,
        }
    }
}
