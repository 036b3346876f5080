//! Database drivers.

pub mod mysql;

pub use mysql::{MysqlConn, MysqlDriver};
