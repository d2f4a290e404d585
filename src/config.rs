/*!
 * Configuration types for CHADTree
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ChadError, Result};

/// Settings shared by the transitions and the standalone host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Number of background workers (0 = auto-detect)
    #[serde(default)]
    pub workers: usize,

    /// Language used for user-facing messages
    #[serde(default = "default_language")]
    pub language: String,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stderr)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Extra directories searched for the system opener, before `PATH`
    #[serde(default)]
    pub opener_search_path: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workers: 0,
            language: default_language(),
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            opener_search_path: Vec::new(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn default_language() -> String {
    "en".to_string()
}

impl Settings {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ChadError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| ChadError::Config(e.to_string()))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// `<config dir>/chadtree/config.toml`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chadtree").join("config.toml"))
    }

    /// Load from `path`, or from the default location when it exists.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}
