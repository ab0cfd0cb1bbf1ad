//! TOML configuration.
//!
//! ```toml
//! events_file = "/home/me/.local/share/almanac/calendar_events.json"
//! strict_dates = false
//! log_level = "warn"
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::events::EVENTS_FILE_NAME;

/// Environment variable naming a config file to use before the default locations
pub const CONFIG_PATH_ENV_VAR: &str = "ALMANAC_CONFIG_FILE";

const APP_DIR: &str = "almanac";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Invalid config file {path}: {source}")]
    Toml { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// JSON file holding the events
    pub events_file:  PathBuf,
    /// Reject out-of-range day/month input instead of clamping it
    pub strict_dates: bool,
    /// Log level filter, e.g. "warn" or "almanac=debug"
    pub log_level:    String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            events_file:  default_events_file(),
            strict_dates: false,
            log_level:    "warn".to_owned(),
        }
    }
}

fn default_events_file() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(EVENTS_FILE_NAME),
        |dir| dir.join(APP_DIR).join(EVENTS_FILE_NAME),
    )
}

/// Candidate config files, most specific first
pub fn find_config_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join(APP_DIR).join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".almanac.toml"));
    }

    locations
}

impl Config {
    /// Loads `explicit` if given, otherwise the first existing file from
    /// [`find_config_locations`], otherwise the defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` if the chosen file cannot be read or parsed. A
    /// missing `explicit` file is an error; missing default locations are not.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match find_config_locations().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Reads and parses one config file.
    ///
    /// # Errors
    /// Returns `ConfigError::Io` or `ConfigError::Toml`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.strict_dates);
        assert_eq!(config.log_level, "warn");
        assert!(config.events_file.ends_with(EVENTS_FILE_NAME));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
events_file = "/tmp/events.json"
strict_dates = true
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.events_file, PathBuf::from("/tmp/events.json"));
        assert!(config.strict_dates);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"dark\"\n").unwrap();

        assert!(matches!(Config::from_file(&path), Err(ConfigError::Toml { .. })));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
