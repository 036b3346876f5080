//! Configuration loading and validation.

pub mod dsn;
mod types;
mod validation;

pub use dsn::{connect_options, Address, Dsn};
pub use types::*;

use std::path::Path;
use std::time::Duration;

use sqlx::mysql::MySqlSslMode;

use crate::error::Result;

impl DriverConfig {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: DriverConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn ssl_mode(&self) -> Result<MySqlSslMode> {
        validation::parse_ssl_mode(&self.ssl_mode)
    }
}
