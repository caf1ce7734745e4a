//! The `Config` struct, its defaults, validation and YAML persistence.
//!
//! The config file lives at `~/.config/clipnote/config.yaml` unless the
//! `CLIPNOTE_CONFIG` environment variable points elsewhere. A missing file is
//! not an error: the annotation panel runs on defaults and nothing is written.

use crate::defaults;
use crate::error::ConfigError;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "CLIPNOTE_CONFIG";

/// Runtime settings for the annotation panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// tmux executable used for pane queries, captures and paste delivery.
    #[serde(default = "defaults::tmux_path")]
    pub tmux_path: String,

    /// Command bridge socket. `CLIPNOTE_SOCKET` and `--socket` take precedence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<PathBuf>,

    /// Initial content panel width (percent).
    #[serde(default = "defaults::split_ratio")]
    pub split_ratio: u16,

    #[serde(default = "defaults::split_ratio_min")]
    pub split_ratio_min: u16,

    #[serde(default = "defaults::split_ratio_max")]
    pub split_ratio_max: u16,

    /// Percentage points added or removed per shrink/expand key press.
    #[serde(default = "defaults::split_ratio_step")]
    pub split_ratio_step: u16,

    /// Maximum characters accepted in a note.
    #[serde(default = "defaults::note_char_limit")]
    pub note_char_limit: usize,

    /// Code points kept in a mark's text snapshot.
    #[serde(default = "defaults::snapshot_width")]
    pub snapshot_width: usize,

    /// Seconds before a hung capture is reported as failed (0 = wait forever).
    #[serde(default = "defaults::capture_timeout_secs")]
    pub capture_timeout_secs: u64,

    /// Capacity of the bounded event queue feeding the interactive loop.
    #[serde(default = "defaults::event_queue_capacity")]
    pub event_queue_capacity: usize,

    /// File log verbosity.
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmux_path: defaults::tmux_path(),
            socket_path: None,
            split_ratio: defaults::split_ratio(),
            split_ratio_min: defaults::split_ratio_min(),
            split_ratio_max: defaults::split_ratio_max(),
            split_ratio_step: defaults::split_ratio_step(),
            note_char_limit: defaults::note_char_limit(),
            snapshot_width: defaults::snapshot_width(),
            capture_timeout_secs: defaults::capture_timeout_secs(),
            event_queue_capacity: defaults::event_queue_capacity(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from the resolved config path, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // An empty file deserializes to unit, not a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml_ng::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file.
    ///
    /// Writes to a temp file then renames, so a crash never leaves a
    /// truncated config behind.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let yaml = serde_yaml_ng::to_string(self).map_err(ConfigError::Serialize)?;
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml).map_err(io_err)?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            io_err(e)
        })?;
        Ok(())
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split_ratio_min > self.split_ratio_max {
            return Err(ConfigError::Validation(format!(
                "split_ratio_min ({}) is greater than split_ratio_max ({})",
                self.split_ratio_min, self.split_ratio_max
            )));
        }
        if self.split_ratio_max > 100 {
            return Err(ConfigError::Validation(format!(
                "split_ratio_max ({}) exceeds 100",
                self.split_ratio_max
            )));
        }
        if !(self.split_ratio_min..=self.split_ratio_max).contains(&self.split_ratio) {
            return Err(ConfigError::Validation(format!(
                "split_ratio ({}) is outside {}..={}",
                self.split_ratio, self.split_ratio_min, self.split_ratio_max
            )));
        }
        if self.split_ratio_step == 0 {
            return Err(ConfigError::Validation(
                "split_ratio_step must be positive".to_string(),
            ));
        }
        if self.event_queue_capacity == 0 {
            return Err(ConfigError::Validation(
                "event_queue_capacity must be positive".to_string(),
            ));
        }
        if self.snapshot_width == 0 {
            return Err(ConfigError::Validation(
                "snapshot_width must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Capture timeout as a `Duration`, or `None` when disabled.
    pub fn capture_timeout(&self) -> Option<Duration> {
        (self.capture_timeout_secs > 0).then(|| Duration::from_secs(self.capture_timeout_secs))
    }

    /// Resolve the config file path: `CLIPNOTE_CONFIG`, else
    /// `~/.config/clipnote/config.yaml`.
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.yaml")
    }

    /// Get the configuration directory path (XDG convention on all Unix platforms).
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir()
                .map(|dir| dir.join("clipnote"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir()
                .map(|home| home.join(".config").join("clipnote"))
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.split_ratio, 70);
        assert_eq!(config.split_ratio_min, 30);
        assert_eq!(config.split_ratio_max, 90);
        assert_eq!(config.snapshot_width, 60);
        assert_eq!(config.log_level, LogLevel::Off);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(!dir.path().join("absent.yaml").exists());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "split_ratio: 50\nlog_level: debug\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.split_ratio, 50);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.tmux_path, "tmux");
        assert_eq!(config.note_char_limit, 500);
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "\n").unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "split_ratio: [not, a, number\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
    }

    #[test]
    fn test_inconsistent_bounds_fail_validation() {
        let config = Config {
            split_ratio_min: 80,
            split_ratio_max: 40,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("split_ratio_min")
        ));

        let config = Config {
            split_ratio: 95,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            event_queue_capacity: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let config = Config {
            tmux_path: "/opt/bin/tmux".to_string(),
            socket_path: Some(PathBuf::from("/tmp/custom.sock")),
            capture_timeout_secs: 0,
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        assert!(!path.with_extension("yaml.tmp").exists());

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.capture_timeout(), None);
    }

    #[test]
    fn test_capture_timeout_duration() {
        let config = Config::default();
        assert_eq!(config.capture_timeout(), Some(Duration::from_secs(30)));
    }
}
