//! Configuration loading and typed config structures for the Snake environment.
//!
//! The configuration lives in `snake-config.yaml`. Every section and every
//! field has a default, so an empty file (or no file at all) yields a
//! 40x30 board with a timeout multiplier of 150 served on port 8080.

use std::path::Path;

use serde::Deserialize;
use snake_sim::env::MIN_COLS;

/// Largest board, in cells, a configuration or reset may ask for.
pub const MAX_BOARD_CELLS: i64 = 65_536;

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

    /// The configuration parsed but describes an unusable setup.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SnakeConfig {
    /// Default board served by the single environment and used by pool
    /// resets that do not name a size.
    #[serde(default)]
    pub board: BoardConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub server: HttpConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SnakeConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `SNAKE_COLS`, `SNAKE_ROWS`, `SNAKE_TIMEOUT_MULT` override `board`
    /// - `SNAKE_HOST`, `SNAKE_REST_PORT` override `server`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override fields from `SNAKE_*` environment variables. Values that do
    /// not parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        override_from_env("SNAKE_COLS", &mut self.board.cols);
        override_from_env("SNAKE_ROWS", &mut self.board.rows);
        override_from_env("SNAKE_TIMEOUT_MULT", &mut self.board.timeout_mult);
        if let Ok(val) = std::env::var("SNAKE_HOST") {
            self.server.host = val;
        }
        override_from_env("SNAKE_REST_PORT", &mut self.server.rest_port);
    }

    /// Reject configurations the engine cannot host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.board.validate()?;
        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid(String::from("server.host is empty")));
        }
        Ok(())
    }
}

fn override_from_env<T: std::str::FromStr>(key: &str, slot: &mut T) {
    if let Some(val) = std::env::var(key).ok().and_then(|v| v.trim().parse().ok()) {
        *slot = val;
    }
}

/// Board geometry and timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BoardConfig {
    /// Board width in cells.
    #[serde(default = "default_cols")]
    pub cols: i32,

    /// Board height in cells.
    #[serde(default = "default_rows")]
    pub rows: i32,

    /// Steps allowed per unit of snake length before a timeout.
    #[serde(default = "default_timeout_mult")]
    pub timeout_mult: u32,
}

impl BoardConfig {
    /// Check that the starting snake fits.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `cols` or `rows` is too small,
    /// or the board exceeds [`MAX_BOARD_CELLS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < MIN_COLS {
            return Err(ConfigError::Invalid(format!(
                "board.cols must be at least {MIN_COLS}, got {}",
                self.cols
            )));
        }
        if self.rows < 1 {
            return Err(ConfigError::Invalid(format!(
                "board.rows must be at least 1, got {}",
                self.rows
            )));
        }
        let cells = i64::from(self.cols).saturating_mul(i64::from(self.rows));
        if cells > MAX_BOARD_CELLS {
            return Err(ConfigError::Invalid(format!(
                "board of {}x{} exceeds {MAX_BOARD_CELLS} cells",
                self.cols, self.rows
            )));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cols: default_cols(),
            rows: default_rows(),
            timeout_mult: default_timeout_mult(),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HttpConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the REST adapter.
    #[serde(default = "default_rest_port")]
    pub rest_port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            rest_port: default_rest_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_cols() -> i32 {
    40
}

const fn default_rows() -> i32 {
    30
}

const fn default_timeout_mult() -> u32 {
    150
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_rest_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_board() {
        let config = SnakeConfig::default();
        assert_eq!(config.board.cols, 40);
        assert_eq!(config.board.rows, 30);
        assert_eq!(config.board.timeout_mult, 150);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.rest_port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
board:
  cols: 12
  rows: 9
  timeout_mult: 80

server:
  host: "127.0.0.1"
  rest_port: 9090

logging:
  level: "debug"
"#;
        let config: SnakeConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.board.cols, 12);
        assert_eq!(config.board.rows, 9);
        assert_eq!(config.board.timeout_mult, 80);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.rest_port, 9090);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: SnakeConfig = serde_yml::from_str("board:\n  cols: 20\n").unwrap();
        assert_eq!(config.board.cols, 20);
        assert_eq!(config.board.rows, 30);
        assert_eq!(config.server.rest_port, 8080);
    }

    #[test]
    fn empty_document_is_the_default() {
        let config: SnakeConfig = SnakeConfig::parse("   \n").unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let err = SnakeConfig::parse("board: [not, a, map").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn validate_rejects_narrow_boards() {
        let mut config = SnakeConfig::default();
        config.board.cols = 3;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.board.cols = 4;
        config.board.rows = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.board.rows = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_oversized_boards() {
        let mut config = SnakeConfig::default();
        config.board.cols = 256;
        config.board.rows = 256;
        assert!(config.validate().is_ok());
        config.board.rows = 257;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.board.cols = 40_000;
        config.board.rows = 40_000;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        config.board.cols = i32::MAX;
        config.board.rows = i32::MAX;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SnakeConfig::from_file(Path::new("/nonexistent/snake-config.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
