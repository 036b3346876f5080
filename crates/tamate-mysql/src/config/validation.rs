//! Configuration validation.

use sqlx::mysql::MySqlSslMode;

use super::DriverConfig;
use crate::error::{DriverError, Result};

/// Validate the configuration.
pub fn validate(config: &DriverConfig) -> Result<()> {
    if config.connect_timeout_secs == 0 {
        return Err(DriverError::Config(
            "connect_timeout_secs must be at least 1".into(),
        ));
    }

    parse_ssl_mode(&config.ssl_mode)?;

    if let Some(dsn) = &config.dsn {
        if dsn.trim().is_empty() {
            return Err(DriverError::Config("dsn must not be empty".into()));
        }
    }

    Ok(())
}

/// Map an `ssl_mode` string onto the sqlx setting.
pub fn parse_ssl_mode(mode: &str) -> Result<MySqlSslMode> {
    match mode.to_lowercase().as_str() {
        "disable" | "disabled" => Ok(MySqlSslMode::Disabled),
        "prefer" | "preferred" => Ok(MySqlSslMode::Preferred),
        "require" | "required" => Ok(MySqlSslMode::Required),
        "verify-ca" => Ok(MySqlSslMode::VerifyCa),
        "verify-full" => Ok(MySqlSslMode::VerifyIdentity),
        other => Err(DriverError::Config(format!(
            "Invalid ssl_mode '{}'. Valid options: disable, prefer, require, verify-ca, verify-full",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&DriverConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_timeout() {
        let config = DriverConfig {
            connect_timeout_secs: 0,
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_blank_dsn() {
        let config = DriverConfig {
            dsn: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_ssl_modes() {
        assert!(matches!(parse_ssl_mode("disable"), Ok(MySqlSslMode::Disabled)));
        assert!(matches!(parse_ssl_mode("PREFER"), Ok(MySqlSslMode::Preferred)));
        assert!(matches!(parse_ssl_mode("require"), Ok(MySqlSslMode::Required)));
        assert!(matches!(parse_ssl_mode("verify-ca"), Ok(MySqlSslMode::VerifyCa)));
        assert!(matches!(
            parse_ssl_mode("verify-full"),
            Ok(MySqlSslMode::VerifyIdentity)
        ));
        assert!(matches!(parse_ssl_mode("sometimes"), Err(DriverError::Config(_))));
    }
}
