//! Configuration
//!
//! Loads `DashboardConfig` from `<config_dir>/lifespan-dashboard/config.toml`.
//! Every field has a default, so a missing file or section is fine.
//! Environment variables override the file:
//! - `LIFESPAN_CSV` replaces `data.csv_path`
//! - `LIFESPAN_EXPORT_DIR` replaces `export.output_dir`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "lifespan-dashboard";

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Input dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_csv_path")]
    pub csv_path: String,

    /// Drop rows whose life expectancy is missing
    #[serde(default = "default_true")]
    pub require_life_expectancy: bool,
}

fn default_csv_path() -> String {
    "data/Life_Expectancy_Data.csv".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            require_life_expectancy: default_true(),
        }
    }
}

/// Native window size in logical pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
    #[serde(default = "default_min_width")]
    pub min_width: f32,
    #[serde(default = "default_min_height")]
    pub min_height: f32,
}

fn default_width() -> f32 {
    1400.0
}

fn default_height() -> f32 {
    900.0
}

fn default_min_width() -> f32 {
    640.0
}

fn default_min_height() -> f32 {
    480.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            min_width: default_min_width(),
            min_height: default_min_height(),
        }
    }
}

/// SVG / JSON export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_export_width")]
    pub width: u32,
    #[serde(default = "default_export_height")]
    pub height: u32,
    #[serde(default)]
    pub open_after_export: bool,
}

fn default_output_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR).join("exports"))
        .unwrap_or_else(|| PathBuf::from("./exports"))
}

fn default_export_width() -> u32 {
    800
}

fn default_export_height() -> u32 {
    500
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            width: default_export_width(),
            height: default_export_height(),
            open_after_export: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl DashboardConfig {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("config.toml")
    }

    /// Load from the default location, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// [`DashboardConfig::load`]).
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(csv) = var("LIFESPAN_CSV").filter(|v| !v.trim().is_empty()) {
            self.data.csv_path = csv;
        }
        if let Some(dir) = var("LIFESPAN_EXPORT_DIR").filter(|v| !v.trim().is_empty()) {
            self.export.output_dir = PathBuf::from(dir);
        }
    }

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> String {
        format!("lifespan_dashboard={}", self.logging.level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = DashboardConfig::parse("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data.csv_path, "data/Life_Expectancy_Data.csv");
        assert!(config.data.require_life_expectancy);
        assert!(!config.export.open_after_export);
        assert_eq!(config.log_directive(), "lifespan_dashboard=info");
    }

    #[test]
    fn test_partial_sections() {
        let config = DashboardConfig::parse(
            r#"
            [data]
            csv_path = "/tmp/who.csv"

            [export]
            width = 1024
            open_after_export = true

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.data.csv_path, "/tmp/who.csv");
        assert!(config.data.require_life_expectancy);
        assert_eq!(config.export.width, 1024);
        assert_eq!(config.export.height, 500);
        assert!(config.export.open_after_export);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.log_directive(), "lifespan_dashboard=debug");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(DashboardConfig::parse("[data]\nrequire_life_expectancy = \"yes\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window]\nwidth = 1000.0\n").unwrap();

        let config = DashboardConfig::from_file(&path).unwrap();
        assert_eq!(config.window.width, 1000.0);
        assert_eq!(config.window.height, 900.0);

        let missing = DashboardConfig::from_file(&dir.path().join("nope.toml"));
        assert!(missing.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = DashboardConfig::default();
        config.apply_overrides(|key| match key {
            "LIFESPAN_CSV" => Some("other.csv".to_string()),
            "LIFESPAN_EXPORT_DIR" => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(config.data.csv_path, "other.csv");
        assert_eq!(config.export.output_dir, ExportConfig::default().output_dir);
    }
}
