//! Layered configuration: built-in defaults, an optional TOML file, then
//! `QUAKE_*` environment variables. CLI flags are applied on top by the
//! command layer.

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::Validate;

use crate::error::{DashboardError, Result};
use crate::utils::constants::{DEFAULT_ASSETS_DIR, DEFAULT_BIND_ADDR, DEFAULT_LOGO, DEFAULT_TITLE};

const DEFAULT_CONFIG_NAME: &str = "quake-dashboard";
const ENV_PREFIX: &str = "QUAKE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub data: DataConfig,

    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Event CSV (or zip holding one)
    pub path: Option<PathBuf>,
    pub use_mmap: bool,
    #[validate(length(min = 1))]
    pub encoding: String,
    #[validate(range(min = 1))]
    pub max_workers: usize,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            use_mmap: false,
            encoding: "utf-8".to_string(),
            max_workers: num_cpus::get(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub bind_addr: String,
    pub assets_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LayoutConfig {
    #[validate(length(min = 1))]
    pub title: String,
    pub logo_src: String,
    /// Lines shown at the foot of the sidebar
    pub credits: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            logo_src: DEFAULT_LOGO.to_string(),
            credits: Vec::new(),
        }
    }
}

impl AppConfig {
    /// The configured dataset path, or a message naming every way to set it.
    pub fn data_path(&self) -> Result<&Path> {
        self.data.path.as_deref().ok_or_else(|| {
            DashboardError::Config(
                "no dataset path configured: pass --data, set QUAKE_DATA__PATH, or set data.path in the config file".to_string(),
            )
        })
    }
}

pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            config_file: None,
            load_env: false,
        }
    }

    /// An explicit file must exist; without one `quake-dashboard.toml` in
    /// the working directory is picked up if present.
    pub fn with_file(mut self, path: Option<&Path>) -> Self {
        self.config_file = path.map(Path::to_path_buf);
        self
    }

    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn build(self) -> Result<AppConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if let Some(path) = &self.config_file {
            debug!("Loading configuration from {}", path.display());
            builder = builder.add_source(File::from(path.clone()).required(true));
        } else {
            builder = builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false));
        }

        if self.load_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_sources() -> Result<()> {
        let config = ConfigLoader::new().build()?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(config.layout.title, DEFAULT_TITLE);
        assert!(config.layout.credits.is_empty());
        assert!(config.data.path.is_none());
        assert!(config.data_path().is_err());
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_section_defaults() -> Result<()> {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(temp_file, "[layout]")?;
        writeln!(temp_file, "title = \"Quakes\"")?;
        temp_file.flush()?;

        let config = ConfigLoader::new().with_file(Some(temp_file.path())).build()?;

        assert_eq!(config.layout.title, "Quakes");
        assert_eq!(config.layout.logo_src, DEFAULT_LOGO);
        assert!(config.layout.credits.is_empty());
        assert_eq!(config.server, ServerConfig::default());
        Ok(())
    }

    #[test]
    fn test_file_overrides_defaults() -> Result<()> {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(temp_file, "[data]")?;
        writeln!(temp_file, "path = \"data/earthquakes.csv\"")?;
        writeln!(temp_file, "max_workers = 2")?;
        writeln!(temp_file, "[layout]")?;
        writeln!(temp_file, "credits = [\"Seismology Lab\"]")?;
        temp_file.flush()?;

        let config = ConfigLoader::new().with_file(Some(temp_file.path())).build()?;

        assert_eq!(config.data_path()?, Path::new("data/earthquakes.csv"));
        assert_eq!(config.data.max_workers, 2);
        assert_eq!(config.layout.credits, vec!["Seismology Lab"]);
        assert_eq!(config.layout.title, DEFAULT_TITLE);
        Ok(())
    }

    #[test]
    fn test_invalid_values_rejected() -> Result<()> {
        let mut temp_file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(temp_file, "[data]")?;
        writeln!(temp_file, "max_workers = 0")?;
        temp_file.flush()?;

        let err = ConfigLoader::new()
            .with_file(Some(temp_file.path()))
            .build()
            .unwrap_err();
        assert!(matches!(err, DashboardError::Validation(_)));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = ConfigLoader::new()
            .with_file(Some(Path::new("/no/such/quake.toml")))
            .build()
            .unwrap_err();
        assert!(matches!(err, DashboardError::ConfigSource(_)));
    }
}
