//! Configuration for the configurator UI
//!
//! Read-only TOML preferences: window title, start view, theme colors and
//! the pixel to terminal-cell scale. Chosen key colors are never written
//! back; the file is only ever read.

use crate::view::View;
use kbconf_keyboard::{CellMetrics, RgbColor};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("initial_view must be keymap or lighting, got {}", .0.display_name())]
    UnbackedInitialView(View),
}

/// Theme colors (dark scheme by default)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: RgbColor,
    /// Default key fill
    pub key: RgbColor,
    pub key_hover: RgbColor,
    pub key_text: RgbColor,
    pub border: RgbColor,
    /// Selected tab, sidebar entry and key cursor
    pub accent: RgbColor,
    /// Reset button fill
    pub reset: RgbColor,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: RgbColor::new(0x2b, 0x2b, 0x2b),
            key: RgbColor::new(0x3c, 0x3f, 0x41),
            key_hover: RgbColor::new(0x50, 0x53, 0x57),
            key_text: RgbColor::WHITE,
            border: RgbColor::new(0x55, 0x55, 0x55),
            accent: RgbColor::new(0xf0, 0xc6, 0x74),
            reset: RgbColor::new(0xd3, 0x2f, 0x2f),
        }
    }
}

/// How many layout pixels make one terminal cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Metrics {
    pub px_per_column: u16,
    pub px_per_row: u16,
}

impl Default for Metrics {
    fn default() -> Self {
        let cells = CellMetrics::default();
        Self {
            px_per_column: cells.px_per_column,
            px_per_row: cells.px_per_row,
        }
    }
}

impl From<Metrics> for CellMetrics {
    fn from(m: Metrics) -> Self {
        CellMetrics {
            px_per_column: m.px_per_column.max(1),
            px_per_row: m.px_per_row.max(1),
        }
    }
}

/// Complete UI configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub initial_view: View,
    pub theme: Theme,
    pub metrics: Metrics,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "DIY Keyboard Configurator".to_string(),
            initial_view: View::Keymap,
            theme: Theme::default(),
            metrics: Metrics::default(),
        }
    }
}

impl AppConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kbconf")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.initial_view.is_backed() {
            return Err(ConfigError::UnbackedInitialView(self.initial_view));
        }
        Ok(())
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        self.metrics.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r##"
initial_view = "lighting"

[theme]
key = "#101010"
"##,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.initial_view, View::Lighting);
        assert_eq!(config.theme.key, RgbColor::new(0x10, 0x10, 0x10));
        // untouched fields keep their defaults
        assert_eq!(config.theme.reset, Theme::default().reset);
        assert_eq!(config.title, "DIY Keyboard Configurator");
        assert_eq!(config.metrics, Metrics::default());
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[theme]\nkey = \"#zzzzzz\"\n").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_unbacked_initial_view_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "initial_view = \"key-test\"\n").unwrap();
        assert!(matches!(
            AppConfig::load(&path),
            Err(ConfigError::UnbackedInitialView(View::KeyTest))
        ));
    }

    #[test]
    fn test_zero_metrics_clamped() {
        let metrics = Metrics {
            px_per_column: 0,
            px_per_row: 0,
        };
        let cells = CellMetrics::from(metrics);
        assert_eq!(cells.px_per_column, 1);
        assert_eq!(cells.px_per_row, 1);
    }
}
