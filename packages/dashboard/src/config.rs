//! Dashboard configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! environment variables. Every field has a default, so running with no
//! config file at all serves the standard 270-farm synthetic portfolio on
//! `127.0.0.1:8080`.

use std::path::{Path, PathBuf};

use farm_monitor_analytics_models::{DEFAULT_TABLE_ROW_LIMIT, SummaryOptions};
use farm_monitor_store::{
    DEFAULT_FARM_COUNT, FarmStore, JsonFileSource, StoreError, SyntheticSource,
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;

use crate::decoration::{Decoration, RandomDecoration, StaticDecoration};

/// Env var naming the config file when no path is given explicitly.
pub const CONFIG_PATH_ENV: &str = "FARM_MONITOR_CONFIG";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        /// Path of the config file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`DashboardConfig`].
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value '{value}' for {name}")]
    InvalidValue {
        /// Name of the env var.
        name: String,
        /// The rejected value.
        value: String,
    },
}

/// Which provider fills the display-only land and biodiversity figures.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecorationMode {
    /// Fixed mid-range values.
    #[default]
    Static,
    /// Fresh random values on every render.
    Random,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Number of synthetic farms to generate.
    pub farm_count: usize,
    /// Generator seed; a random seed is used when absent.
    pub seed: Option<u64>,
    /// JSON fixture to load instead of generating farms.
    pub data_file: Option<PathBuf>,
    /// Maximum number of rows in the farm table.
    pub table_row_limit: usize,
    pub decoration: DecorationMode,
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            farm_count: DEFAULT_FARM_COUNT,
            seed: None,
            data_file: None,
            table_row_limit: DEFAULT_TABLE_ROW_LIMIT,
            decoration: DecorationMode::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses a TOML config document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the document is invalid, or
    /// [`ConfigError::InvalidValue`] if `table_row_limit` is zero.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        check_row_limit("table_row_limit", config.table_row_limit)?;
        Ok(config)
    }

    /// Loads configuration from `path` (or the file named by
    /// [`CONFIG_PATH_ENV`]) and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or an
    /// override is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let mut config = match path {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                let contents = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Io { path, source })?;
                Self::from_toml_str(&contents)?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides from `lookup`, which maps env var names to values.
    ///
    /// Recognized names: `BIND_ADDR`, `PORT`, `FARM_MONITOR_SEED`,
    /// `FARM_MONITOR_DATA_FILE`, `FARM_MONITOR_TABLE_ROW_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a numeric override does not
    /// parse or the table row limit is zero.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = parse_env("PORT", &port)?;
        }
        if let Some(seed) = lookup("FARM_MONITOR_SEED") {
            self.seed = Some(parse_env("FARM_MONITOR_SEED", &seed)?);
        }
        if let Some(data_file) = lookup("FARM_MONITOR_DATA_FILE") {
            self.data_file = Some(PathBuf::from(data_file));
        }
        if let Some(limit) = lookup("FARM_MONITOR_TABLE_ROW_LIMIT") {
            let limit = parse_env("FARM_MONITOR_TABLE_ROW_LIMIT", &limit)?;
            self.table_row_limit = check_row_limit("FARM_MONITOR_TABLE_ROW_LIMIT", limit)?;
        }
        Ok(())
    }

    #[must_use]
    pub const fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            table_row_limit: self.table_row_limit,
        }
    }

    /// Builds the farm store from the configured data source.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the source fails or produces invalid
    /// records.
    pub fn open_store(&self) -> Result<FarmStore, StoreError> {
        if let Some(path) = &self.data_file {
            return FarmStore::from_source(&JsonFileSource::new(path), None);
        }

        let source = self.seed.map_or_else(
            || SyntheticSource::with_random_seed(self.farm_count),
            |seed| SyntheticSource::new(self.farm_count, seed, chrono::Utc::now().date_naive()),
        );
        FarmStore::from_source(&source, Some(self.farm_count))
    }

    /// Builds the configured decoration provider.
    #[must_use]
    pub fn decoration(&self) -> Box<dyn Decoration> {
        match self.decoration {
            DecorationMode::Static => Box::new(StaticDecoration),
            DecorationMode::Random => Box::new(RandomDecoration),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// A zero limit would render a table with no rows for a non-empty subset.
fn check_row_limit(name: &str, limit: usize) -> Result<usize, ConfigError> {
    if limit == 0 {
        return Err(ConfigError::InvalidValue {
            name: name.to_string(),
            value: limit.to_string(),
        });
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(
            DashboardConfig::from_toml_str("").unwrap(),
            DashboardConfig::default()
        );
    }

    #[test]
    fn parses_partial_document() {
        let config = DashboardConfig::from_toml_str(
            r#"
            seed = 42
            table_row_limit = 20
            decoration = "random"

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(42));
        assert_eq!(config.table_row_limit, 20);
        assert_eq!(config.decoration, DecorationMode::Random);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "127.0.0.1");
        assert_eq!(config.farm_count, 270);
    }

    #[test]
    fn rejects_unknown_decoration() {
        assert!(matches!(
            DashboardConfig::from_toml_str("decoration = \"sparkles\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn env_overrides_file_values() {
        let env: BTreeMap<&str, &str> = [
            ("BIND_ADDR", "0.0.0.0"),
            ("PORT", "8050"),
            ("FARM_MONITOR_SEED", "7"),
            ("FARM_MONITOR_TABLE_ROW_LIMIT", "25"),
        ]
        .into_iter()
        .collect();

        let mut config = DashboardConfig::default();
        config
            .apply_env(|name| env.get(name).map(ToString::to_string))
            .unwrap();

        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.server.port, 8050);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.summary_options().table_row_limit, 25);
    }

    #[test]
    fn invalid_env_value_is_reported() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_env(|name| (name == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref name, .. } if name == "PORT"));
    }

    #[test]
    fn zero_row_limit_is_rejected() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_env(|name| (name == "FARM_MONITOR_TABLE_ROW_LIMIT").then(|| "0".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref name, ref value }
                if name == "FARM_MONITOR_TABLE_ROW_LIMIT" && value == "0"
        ));
        assert_eq!(config.table_row_limit, 50);

        assert!(matches!(
            DashboardConfig::from_toml_str("table_row_limit = 0"),
            Err(ConfigError::InvalidValue { ref name, .. }) if name == "table_row_limit"
        ));
    }

    #[test]
    fn io_error_names_the_file() {
        let err = DashboardConfig::load(Some(Path::new("/nonexistent/farm_monitor.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/farm_monitor.toml"));
    }

    #[test]
    fn seeded_store_has_configured_size() {
        let config = DashboardConfig {
            farm_count: 30,
            seed: Some(11),
            ..DashboardConfig::default()
        };
        assert_eq!(config.open_store().unwrap().len(), 30);
    }
}
