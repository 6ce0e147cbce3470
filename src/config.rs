use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_file")]
    pub log_file: String,

    #[serde(default = "default_server_address")]
    pub server_address: String,

    #[serde(default = "default_server_port")]
    pub server_port: u16,

    /// Directory holding the built front-end (served at `/`).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Docker socket path. Local defaults (`DOCKER_HOST` or the unix socket) when unset.
    #[serde(default)]
    pub docker_socket: Option<String>,

    /// Mount point used for the disk usage percentage.
    #[serde(default = "default_disk_path")]
    pub disk_path: String,

    #[serde(default = "default_log_tail_lines")]
    pub log_tail_lines: usize,

    #[serde(default = "default_log_follow")]
    pub log_follow: bool,

    #[serde(default = "default_log_ping_interval_secs")]
    pub log_ping_interval_secs: u64,
}

impl Config {
    /// Loads the configuration from an optional TOML file, then `PANEL_*` environment variables.
    pub fn from_file(file: &str) -> Result<Self, ConfigError> {
        Self::from_builder(ConfigLoader::builder().add_source(File::with_name(file).required(false)))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix("PANEL").try_parsing(true))
            .build()?
            .try_deserialize::<Self>()
    }
}

fn default_server_address() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_disk_path() -> String {
    "/".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "panel.log".to_string()
}

fn default_log_tail_lines() -> usize {
    100
}

fn default_log_follow() -> bool {
    true
}

fn default_log_ping_interval_secs() -> u64 {
    2
}
