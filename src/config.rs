//! User configuration.
//!
//! Optional defaults loaded from a TOML file in the platform config
//! directory. Every value can be overridden from the command line.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Persistent defaults for board discovery and reload behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Board directory to use instead of auto-detection.
    pub board_path: Option<PathBuf>,
    /// Serial port to use instead of auto-detection.
    pub port: Option<String>,
    /// Whether to notify the board after writes (defaults to true).
    #[serde(default = "default_reload")]
    pub reload: bool,
}

fn default_reload() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            board_path: None,
            port: None,
            reload: true,
        }
    }
}

impl Config {
    /// Platform config directory for padmap.
    ///
    /// - Linux: `~/.config/padmap/`
    /// - macOS: `~/Library/Application Support/padmap/`
    /// - Windows: `%APPDATA%\padmap\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join("padmap");
        Ok(config_dir)
    }

    fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads the config file, falling back to defaults when absent.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).with_context(|| {
            format!("Failed to read config file: {}", config_path.display())
        })?;
        let config: Self = toml::from_str(&content).with_context(|| {
            format!("Failed to parse config file: {}", config_path.display())
        })?;
        Ok(config)
    }

    /// Saves the config, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).with_context(|| {
            format!("Failed to create config directory: {}", config_dir.display())
        })?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let config_path = Self::config_file_path()?;
        fs::write(&config_path, content).with_context(|| {
            format!("Failed to write config file: {}", config_path.display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reload_is_enabled() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.reload);
        assert!(config.board_path.is_none());
        assert!(config.port.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            board_path = "/media/user/CIRCUITPY"
            port = "/dev/ttyACM1"
            reload = false
            "#,
        )
        .unwrap();
        assert_eq!(config.board_path, Some(PathBuf::from("/media/user/CIRCUITPY")));
        assert_eq!(config.port.as_deref(), Some("/dev/ttyACM1"));
        assert!(!config.reload);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            board_path: Some(PathBuf::from("/tmp/board")),
            port: None,
            reload: true,
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
