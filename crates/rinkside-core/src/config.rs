//! Configuration loading and typed config structures for the scoreboard.
//!
//! The canonical configuration lives in `rinkside-config.yaml` next to the
//! binary. Every section and field has a default, so a missing or empty
//! file yields a working local-only scoreboard.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level scoreboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScoreboardConfig {
    /// Game rules (period length, overtime, history depth).
    #[serde(default)]
    pub game: GameConfig,

    /// Shared-game replication settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Local persistence.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP server.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScoreboardConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DRAGONFLY_URL` overrides `sync.dragonfly_url`
    /// - `NATS_URL` overrides `sync.nats_url`
    /// - `RINKSIDE_PORT` overrides `server.port`
    /// - `RINKSIDE_STATE_PATH` overrides `storage.state_path`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if it exists, otherwise use defaults (with
    /// environment overrides applied either way).
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override connection settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DRAGONFLY_URL") {
            self.sync.dragonfly_url = val;
        }
        if let Ok(val) = std::env::var("NATS_URL") {
            self.sync.nats_url = val;
        }
        if let Some(port) = std::env::var("RINKSIDE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("RINKSIDE_STATE_PATH") {
            self.storage.state_path = val;
        }
    }
}

/// Game rules.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Regulation period length in seconds.
    #[serde(default = "default_period_length_secs")]
    pub period_length_secs: u32,

    /// Number of regulation periods.
    #[serde(default = "default_max_periods")]
    pub max_periods: u32,

    /// Overtime period length in seconds.
    #[serde(default = "default_overtime_length_secs")]
    pub overtime_length_secs: u32,

    /// Undo snapshots kept.
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Timeouts each team gets per game.
    #[serde(default = "default_timeouts_per_team")]
    pub timeouts_per_team: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            period_length_secs: default_period_length_secs(),
            max_periods: default_max_periods(),
            overtime_length_secs: default_overtime_length_secs(),
            history_capacity: default_history_capacity(),
            timeouts_per_team: default_timeouts_per_team(),
        }
    }
}

/// Shared-game replication settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    /// Connect to Dragonfly/NATS at startup. When false, an in-process
    /// store is used and games can only be shared within this server.
    #[serde(default)]
    pub enabled: bool,

    /// Dragonfly (Redis protocol) URL for shared game records.
    #[serde(default = "default_dragonfly_url")]
    pub dragonfly_url: String,

    /// NATS URL for change notifications.
    #[serde(default = "default_nats_url")]
    pub nats_url: String,

    /// Coalescing window for outgoing host updates, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Seconds a shared record survives without a host heartbeat.
    #[serde(default = "default_presence_ttl_secs")]
    pub presence_ttl_secs: u64,

    /// Seconds between host heartbeats.
    #[serde(default = "default_heartbeat_interval_secs")]
    pub heartbeat_interval_secs: u64,

    /// Base URL used to build viewer share links.
    #[serde(default = "default_share_base_url")]
    pub share_base_url: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dragonfly_url: default_dragonfly_url(),
            nats_url: default_nats_url(),
            debounce_ms: default_debounce_ms(),
            presence_ttl_secs: default_presence_ttl_secs(),
            heartbeat_interval_secs: default_heartbeat_interval_secs(),
            share_base_url: default_share_base_url(),
        }
    }
}

/// Local persistence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON state file.
    #[serde(default = "default_state_path")]
    pub state_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
        }
    }
}

/// HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_period_length_secs() -> u32 {
    1200
}

const fn default_max_periods() -> u32 {
    3
}

const fn default_overtime_length_secs() -> u32 {
    300
}

const fn default_history_capacity() -> usize {
    50
}

const fn default_timeouts_per_team() -> u32 {
    1
}

fn default_dragonfly_url() -> String {
    "redis://localhost:6379".to_owned()
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_owned()
}

const fn default_debounce_ms() -> u64 {
    100
}

const fn default_presence_ttl_secs() -> u64 {
    30
}

const fn default_heartbeat_interval_secs() -> u64 {
    10
}

fn default_share_base_url() -> String {
    "http://localhost:3000/".to_owned()
}

fn default_state_path() -> String {
    "hockey-scoreboard-storage.json".to_owned()
}

const fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_regulation_hockey() {
        let config = ScoreboardConfig::default();
        assert_eq!(config.game.period_length_secs, 1200);
        assert_eq!(config.game.max_periods, 3);
        assert_eq!(config.game.overtime_length_secs, 300);
        assert_eq!(config.game.history_capacity, 50);
        assert_eq!(config.sync.debounce_ms, 100);
        assert!(!config.sync.enabled);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
game:
  period_length_secs: 900
  max_periods: 2
  overtime_length_secs: 180
  history_capacity: 20
  timeouts_per_team: 2

sync:
  enabled: true
  debounce_ms: 250
  presence_ttl_secs: 60
  heartbeat_interval_secs: 15
  share_base_url: "https://rink.example/"

storage:
  state_path: "/var/lib/rinkside/state.json"

logging:
  level: "debug"
  json: true
"#;
        let config = ScoreboardConfig::parse(yaml);
        assert!(config.is_ok());
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.game.period_length_secs, 900);
        assert_eq!(config.game.max_periods, 2);
        assert_eq!(config.game.timeouts_per_team, 2);
        assert!(config.sync.enabled);
        assert_eq!(config.sync.debounce_ms, 250);
        assert_eq!(config.sync.share_base_url, "https://rink.example/");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = ScoreboardConfig::parse("game:\n  max_periods: 4\n");
        let config = config.ok().unwrap_or_default();
        assert_eq!(config.game.max_periods, 4);
        assert_eq!(config.game.period_length_secs, 1200);
        assert_eq!(config.sync.heartbeat_interval_secs, 10);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(ScoreboardConfig::parse("").is_ok());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("rinkside-config.yaml");
        if path.exists() {
            let config = ScoreboardConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
