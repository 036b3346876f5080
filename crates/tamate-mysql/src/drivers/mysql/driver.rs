//! MySQL driver factory.

use crate::config::DriverConfig;
use crate::core::traits::{Conn, Driver};
use crate::error::Result;

use super::conn::MysqlConn;

/// Name the driver registers under.
pub const DRIVER_NAME: &str = "mysql";

/// Produces [`MysqlConn`] façades sharing one configuration.
#[derive(Debug, Clone, Default)]
pub struct MysqlDriver {
    config: DriverConfig,
}

impl MysqlDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `config` for every connection; it is validated first.
    pub fn with_config(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Create a closed connection with the concrete type.
    pub fn connection(&self) -> MysqlConn {
        MysqlConn::new(self.config.clone())
    }
}

impl Driver for MysqlDriver {
    fn name(&self) -> &str {
        DRIVER_NAME
    }

    fn new_conn(&self) -> Box<dyn Conn> {
        Box::new(self.connection())
    }
}
