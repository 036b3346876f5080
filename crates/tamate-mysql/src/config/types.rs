//! Configuration type definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Driver configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Connection string used by the CLI when `--dsn` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dsn: Option<String>,

    /// Seconds to wait for connect and ping (default: 30).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// TLS mode (default: "prefer").
    /// Valid values: disable, prefer, require, verify-ca, verify-full.
    #[serde(default = "default_prefer")]
    pub ssl_mode: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            dsn: None,
            connect_timeout_secs: default_connect_timeout_secs(),
            ssl_mode: default_prefer(),
        }
    }
}

impl fmt::Debug for DriverConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The DSN may carry a password
        f.debug_struct("DriverConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "***"))
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("ssl_mode", &self.ssl_mode)
            .finish()
    }
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_prefer() -> String {
    "prefer".to_string()
}
