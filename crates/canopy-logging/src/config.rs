// ABOUTME: Configuration structures and environment variable parsing for logging
// ABOUTME: Handles log levels, output targets, and file path configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use tracing::Level;

/// Serializable wrapper around `tracing::Level`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub Level);

impl Serialize for LogLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.as_str().to_lowercase())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<LogLevel, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_log_level(&s)
            .map(LogLevel)
            .map_err(serde::de::Error::custom)
    }
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        LogLevel(level)
    }
}

impl From<LogLevel> for Level {
    fn from(log_level: LogLevel) -> Self {
        log_level.0
    }
}

/// Main configuration structure for the logging system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Global log level (trace, debug, info, warn, error)
    pub level: LogLevel,

    /// Per-module log level overrides, e.g. `canopy_tree = "debug"`
    pub module_levels: HashMap<String, LogLevel>,

    pub output: OutputConfig,

    pub file: FileConfig,
}

/// Which sinks receive log records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Human-readable output on stderr
    pub console: bool,

    /// Daily rolling log file
    pub file: bool,

    /// Structured JSON records on stderr
    pub json: bool,

    /// Multi-line console output instead of compact lines
    pub pretty_console: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Path to the log file (defaults to ~/.config/canopy/canopy.log)
    pub path: PathBuf,

    /// Maximum file size before rotation (in MB)
    pub max_size_mb: u64,

    /// Number of rotated files to keep
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel(Level::INFO),
            module_levels: HashMap::new(),
            output: OutputConfig::default(),
            file: FileConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            console: true,
            file: true,
            json: false,
            pretty_console: false,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            path: default_log_file_path(),
            max_size_mb: 50,
            max_files: 5,
        }
    }
}

impl LoggingConfig {
    /// Default configuration with environment variable overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Replace the global level, keeping module overrides.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = LogLevel(level);
        self
    }

    /// Apply environment variable overrides to this configuration.
    ///
    /// `CANOPY_LOG` takes precedence over `RUST_LOG`. The boolean switches
    /// only need to be present to take effect.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(level_str) = env::var("CANOPY_LOG") {
            self.level = LogLevel(parse_log_level(&level_str).context("Invalid CANOPY_LOG level")?);
        } else if let Ok(directives) = env::var("RUST_LOG") {
            self.parse_directives(&directives)?;
        }

        if env::var_os("CANOPY_LOG_JSON").is_some() {
            self.output.json = true;
        }
        if env::var_os("CANOPY_LOG_NO_CONSOLE").is_some() {
            self.output.console = false;
        }
        if env::var_os("CANOPY_LOG_NO_FILE").is_some() {
            self.output.file = false;
        }

        Ok(())
    }

    /// Parse a `RUST_LOG`-style directive list such as `info,canopy_tree=debug`.
    pub fn parse_directives(&mut self, directives: &str) -> Result<()> {
        for directive in directives.split(',').map(str::trim) {
            if directive.is_empty() {
                continue;
            }

            match directive.split_once('=') {
                Some((module, level_str)) => {
                    let level = parse_log_level(level_str).with_context(|| {
                        format!("Invalid log level '{level_str}' for module '{module}'")
                    })?;
                    self.module_levels
                        .insert(module.to_string(), LogLevel(level));
                }
                None => {
                    self.level = LogLevel(
                        parse_log_level(directive)
                            .with_context(|| format!("Invalid global log level '{directive}'"))?,
                    );
                }
            }
        }
        Ok(())
    }
}

/// Default log file location: ~/.config/canopy/canopy.log
pub fn default_log_file_path() -> PathBuf {
    match dirs::config_dir() {
        Some(config_dir) => config_dir.join("canopy").join("canopy.log"),
        None => PathBuf::from("canopy.log"),
    }
}

/// Parse a log level string (case-insensitive).
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
            level_str
        ),
    }
}
