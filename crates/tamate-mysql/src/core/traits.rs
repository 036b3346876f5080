//! Core traits of the abstraction layer.
//!
//! - [`Driver`]: factory producing connections for one database engine
//! - [`Conn`]: schema and row access for one open connection
//!
//! Connections take `&mut self` for every operation. One connection serves
//! one caller at a time; share it across tasks only behind a lock.

use async_trait::async_trait;

use crate::error::Result;

use super::schema::Schema;
use super::value::Row;

/// A connection to a tabular data source.
///
/// A connection starts closed. [`Conn::open`] moves it to the open state and
/// [`Conn::close`] back; every other operation requires an open connection.
/// Cancelling an operation means dropping its future; the connection should
/// then be closed or dropped.
#[async_trait]
pub trait Conn: Send {
    /// Establish the connection and verify the server is reachable.
    async fn open(&mut self, dsn: &str) -> Result<()>;

    /// Release the connection.
    async fn close(&mut self) -> Result<()>;

    /// Describe a table.
    async fn get_schema(&mut self, name: &str) -> Result<Schema>;

    /// Replace a table with one built from `schema`.
    async fn set_schema(&mut self, name: &str, schema: &Schema) -> Result<()>;

    /// Read every row of a table.
    async fn get_rows(&mut self, name: &str) -> Result<Vec<Row>>;

    /// Replace the contents of a table with `rows`.
    async fn set_rows(&mut self, name: &str, rows: &[Row]) -> Result<()>;
}

/// Factory for connections of one database engine.
pub trait Driver: Send + Sync {
    /// Name the driver is registered under (e.g. "mysql").
    fn name(&self) -> &str;

    /// Create a new, closed connection.
    fn new_conn(&self) -> Box<dyn Conn>;
}
