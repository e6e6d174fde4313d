//! # CLI Configuration
//!
//! ## Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment (highest)    BARRA_DB_PATH=/srv/barra.db               │
//! │  2. TOML file                --config <path>, or                        │
//! │                              ~/.config/barra/config.toml (Linux)        │
//! │  3. Defaults (lowest)        ./barra.db, BarRates::default()            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```toml
//! [database]
//! path = "/var/lib/barra/barra.db"
//!
//! [rates.yields]
//! drinks_per_bottle = 15.0
//!
//! [rates.staff]
//! guests_per_bartender = 45
//! ```
//!
//! Any table left out keeps its defaults.

use barra_core::{BarRates, BarTemplate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::CliResult;

/// Environment variable that overrides the database path.
pub const DB_PATH_ENV: &str = "BARRA_DB_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: PathBuf::from("./barra.db"),
        }
    }
}

/// Everything the binary reads at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub rates: BarRates,
    /// Product split used by `estimate --shopping-list`.
    pub template: BarTemplate,
}

impl AppConfig {
    /// Loads defaults, then the config file, then the environment.
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path.or_else(Self::default_config_path) {
            Some(path) if path.exists() => {
                info!(?path, "Loading config from file");
                Self::from_file(&path)?
            }
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides(std::env::var(DB_PATH_ENV).ok());
        config.rates.validate()?;
        Ok(config)
    }

    /// Parses one TOML file without looking at the environment.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn apply_env_overrides(&mut self, db_path: Option<String>) {
        if let Some(path) = db_path.filter(|p| !p.trim().is_empty()) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "barra", "barra")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::io::Write;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("barra-{}-{}.toml", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [database]
            path = "/tmp/eventos.db"

            [rates.yields]
            drinks_per_bottle = 15.0
            "#,
        )
        .unwrap();

        assert_eq!(config.database.path, PathBuf::from("/tmp/eventos.db"));
        assert_eq!(config.rates.yields.drinks_per_bottle, 15.0);
        assert_eq!(config.rates.staff, BarRates::default().staff);
        assert_eq!(config.template, BarTemplate::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_env_override() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(Some("/data/barra.db".into()));
        assert_eq!(config.database.path, PathBuf::from("/data/barra.db"));

        // Blank values are ignored
        config.apply_env_overrides(Some("  ".into()));
        assert_eq!(config.database.path, PathBuf::from("/data/barra.db"));
    }

    #[test]
    fn test_load_rejects_invalid_rates() {
        let path = write_temp(
            "invalid",
            "[rates.yields]\ndrinks_per_bottle = 0.0\n",
        );
        let result = AppConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(CliError::Core(_))));
    }

    #[test]
    fn test_load_reports_bad_toml() {
        let path = write_temp("broken", "[database\npath = 1");
        let result = AppConfig::from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(CliError::Toml(_))));
    }
}
