//! Driver registry for explicit dependency injection.
//!
//! The [`DriverRegistry`] maps driver names to driver factories. It is built
//! and owned by the caller and passed to whatever opens data sources; there
//! is no process-wide registration.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DriverError, Result};

use super::traits::{Conn, Driver};

/// Registry of drivers by name.
///
/// # Example
///
/// ```rust,no_run
/// use tamate_mysql::{Conn, DriverRegistry};
///
/// # async fn demo() -> tamate_mysql::Result<()> {
/// let registry = DriverRegistry::with_builtins();
/// let mut conn = registry.open("mysql", "root:example@/tamatest").await?;
/// let schema = conn.get_schema("example").await?;
/// println!("{} has {} columns", schema.name, schema.columns.len());
/// conn.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default, Clone)]
pub struct DriverRegistry {
    drivers: HashMap<String, Arc<dyn Driver>>,
}

impl DriverRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in MySQL driver registered.
    pub fn with_builtins() -> Self {
        let driver: Arc<dyn Driver> = Arc::new(crate::drivers::MysqlDriver::new());
        let mut registry = Self::new();
        registry.drivers.insert(driver.name().to_string(), driver);
        registry
    }

    /// Register a driver under its own name.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateDriver` if the name is already taken.
    pub fn register(&mut self, driver: impl Driver + 'static) -> Result<()> {
        self.register_arc(Arc::new(driver))
    }

    /// Register a shared driver.
    pub fn register_arc(&mut self, driver: Arc<dyn Driver>) -> Result<()> {
        let name = driver.name().to_string();
        if self.drivers.contains_key(&name) {
            return Err(DriverError::DuplicateDriver(name));
        }
        debug!("Registered driver '{}'", name);
        self.drivers.insert(name, driver);
        Ok(())
    }

    /// Get a driver by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Driver>> {
        self.drivers.get(name).cloned()
    }

    /// Check if a driver is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.drivers.contains_key(name)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.drivers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Create a connection with the named driver and open it.
    pub async fn open(&self, name: &str, dsn: &str) -> Result<Box<dyn Conn>> {
        let driver = self
            .get(name)
            .ok_or_else(|| DriverError::DriverNotFound(name.to_string()))?;
        let mut conn = driver.new_conn();
        conn.open(dsn).await?;
        Ok(conn)
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Schema;
    use crate::core::value::Row;
    use async_trait::async_trait;

    struct NullConn;

    #[async_trait]
    impl Conn for NullConn {
        async fn open(&mut self, _dsn: &str) -> Result<()> {
            Ok(())
        }
        async fn close(&mut self) -> Result<()> {
            Ok(())
        }
        async fn get_schema(&mut self, name: &str) -> Result<Schema> {
            Err(DriverError::SchemaNotFound(name.to_string()))
        }
        async fn set_schema(&mut self, _name: &str, _schema: &Schema) -> Result<()> {
            Ok(())
        }
        async fn get_rows(&mut self, _name: &str) -> Result<Vec<Row>> {
            Ok(Vec::new())
        }
        async fn set_rows(&mut self, _name: &str, _rows: &[Row]) -> Result<()> {
            Ok(())
        }
    }

    struct NullDriver;

    impl Driver for NullDriver {
        fn name(&self) -> &str {
            "null"
        }
        fn new_conn(&self) -> Box<dyn Conn> {
            Box::new(NullConn)
        }
    }

    #[test]
    fn test_builtins_register_mysql() {
        let registry = DriverRegistry::with_builtins();
        assert!(registry.contains("mysql"));
        assert_eq!(registry.get("mysql").unwrap().name(), "mysql");
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = DriverRegistry::new();
        registry.register(NullDriver).unwrap();
        assert!(matches!(
            registry.register(NullDriver),
            Err(DriverError::DuplicateDriver(name)) if name == "null"
        ));
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = DriverRegistry::with_builtins();
        registry.register(NullDriver).unwrap();
        assert_eq!(registry.names(), vec!["mysql", "null"]);
    }

    #[tokio::test]
    async fn test_open_unknown_driver() {
        let registry = DriverRegistry::new();
        let err = registry.open("oracle", "dsn").await.err().unwrap();
        assert!(matches!(err, DriverError::DriverNotFound(name) if name == "oracle"));
    }

    #[tokio::test]
    async fn test_open_registered_driver() {
        let mut registry = DriverRegistry::new();
        registry.register(NullDriver).unwrap();
        let mut conn = registry.open("null", "anything").await.unwrap();
        assert!(conn.get_rows("t").await.unwrap().is_empty());
        assert!(matches!(
            conn.get_schema("t").await,
            Err(DriverError::SchemaNotFound(_))
        ));
    }
}
