//! # tamate-mysql
//!
//! MySQL/MariaDB driver for the tamate tabular-data abstraction.
//!
//! A [`Driver`] produces [`Conn`] façades that read and replace whole tables
//! through four operations:
//!
//! - **get_schema**: describe a table from INFORMATION_SCHEMA
//! - **set_schema**: drop and recreate a table from a [`Schema`]
//! - **get_rows**: read every row, typed per column
//! - **set_rows**: recreate a table and insert rows in order
//!
//! ## Example
//!
//! ```rust,no_run
//! use tamate_mysql::{Conn, DriverRegistry};
//!
//! #[tokio::main]
//! async fn main() -> tamate_mysql::Result<()> {
//!     let registry = DriverRegistry::with_builtins();
//!     let mut conn = registry.open("mysql", "root:example@/tamatest").await?;
//!     let schema = conn.get_schema("example").await?;
//!     let rows = conn.get_rows("example").await?;
//!     println!("{}: {} columns, {} rows", schema.name, schema.columns.len(), rows.len());
//!     conn.close().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod drivers;
pub mod error;

// Re-exports for convenient access
pub use config::{Dsn, DriverConfig};
pub use self::core::{
    Column, ColumnType, ColumnValue, Conn, Driver, DriverRegistry, Key, KeyType, Row, Schema,
    Value,
};
pub use drivers::{MysqlConn, MysqlDriver};
pub use error::{DriverError, Result};
