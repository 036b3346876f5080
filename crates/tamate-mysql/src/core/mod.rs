//! Core abstractions shared by all drivers.
//!
//! - [`schema`]: column types, columns, keys and table schemas
//! - [`value`]: dynamically typed values and rows
//! - [`traits`]: the [`Driver`] and [`Conn`] traits drivers implement
//! - [`catalog`]: the [`DriverRegistry`] mapping names to drivers
//! - [`identifier`]: identifier validation and quoting

pub mod catalog;
pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use catalog::DriverRegistry;
pub use schema::{Column, ColumnType, Key, KeyType, Schema};
pub use traits::{Conn, Driver};
pub use value::{ColumnValue, GroupByKey, Row, RowValues, Value};
