//! MySQL connection façade.

use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::Connection;
use tracing::{debug, info};

use crate::config::{connect_options, DriverConfig};
use crate::core::schema::Schema;
use crate::core::traits::Conn;
use crate::core::value::Row;
use crate::error::{DriverError, Result};

use super::dialect::MysqlDialect;
use super::introspect::load_schema;
use super::reader::load_rows;
use super::writer::{execute, write_rows, write_schema};

/// One MySQL connection, closed until [`Conn::open`] succeeds.
pub struct MysqlConn {
    config: DriverConfig,
    dialect: MysqlDialect,
    conn: Option<MySqlConnection>,
}

impl MysqlConn {
    pub fn new(config: DriverConfig) -> Self {
        Self {
            config,
            dialect: MysqlDialect::new(),
            conn: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn dialect(&self) -> &MysqlDialect {
        &self.dialect
    }

    fn native(&mut self) -> Result<&mut MySqlConnection> {
        self.conn.as_mut().ok_or(DriverError::NotOpen)
    }

    /// Check the server is still reachable.
    pub async fn ping(&mut self) -> Result<()> {
        self.native()?
            .ping()
            .await
            .map_err(|e| DriverError::connection(e, "pinging server"))
    }

    pub async fn create_database(&mut self, name: &str) -> Result<()> {
        let sql = self.dialect.create_database(name)?;
        execute(self.native()?, &sql, &format!("creating database {}", name)).await?;
        info!("Created database {}", name);
        Ok(())
    }

    pub async fn drop_database(&mut self, name: &str) -> Result<()> {
        let sql = self.dialect.drop_database(name)?;
        execute(self.native()?, &sql, &format!("dropping database {}", name)).await?;
        info!("Dropped database {}", name);
        Ok(())
    }

    /// Make `name` the current database for later operations.
    pub async fn use_database(&mut self, name: &str) -> Result<()> {
        let sql = self.dialect.use_database(name)?;
        execute(self.native()?, &sql, &format!("switching to database {}", name)).await?;
        debug!("Using database {}", name);
        Ok(())
    }
}

impl std::fmt::Debug for MysqlConn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlConn")
            .field("config", &self.config)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Default for MysqlConn {
    fn default() -> Self {
        Self::new(DriverConfig::default())
    }
}

#[async_trait]
impl Conn for MysqlConn {
    async fn open(&mut self, dsn: &str) -> Result<()> {
        if self.conn.is_some() {
            return Err(DriverError::AlreadyOpen);
        }
        self.config.validate()?;

        let options = connect_options(dsn)?.ssl_mode(self.config.ssl_mode()?);
        let timeout = self.config.connect_timeout();

        let connect = async {
            let mut conn = MySqlConnection::connect_with(&options)
                .await
                .map_err(|e| DriverError::connection(e, "connecting to MySQL"))?;
            conn.ping()
                .await
                .map_err(|e| DriverError::connection(e, "testing MySQL connection"))?;
            Ok::<_, DriverError>(conn)
        };

        let conn = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| {
                DriverError::connection(
                    sqlx::Error::Io(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("no response within {}s", timeout.as_secs()),
                    )),
                    "connecting to MySQL",
                )
            })??;

        info!("Connected to MySQL");
        self.conn = Some(conn);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let conn = self.conn.take().ok_or(DriverError::NotOpen)?;
        conn.close()
            .await
            .map_err(|e| DriverError::connection(e, "closing MySQL connection"))?;
        info!("Closed MySQL connection");
        Ok(())
    }

    async fn get_schema(&mut self, name: &str) -> Result<Schema> {
        let dialect = self.dialect;
        load_schema(self.native()?, &dialect, name).await
    }

    async fn set_schema(&mut self, name: &str, schema: &Schema) -> Result<()> {
        let dialect = self.dialect;
        write_schema(self.native()?, &dialect, name, schema).await
    }

    async fn get_rows(&mut self, name: &str) -> Result<Vec<Row>> {
        let dialect = self.dialect;
        load_rows(self.native()?, &dialect, name).await
    }

    async fn set_rows(&mut self, name: &str, rows: &[Row]) -> Result<()> {
        let dialect = self.dialect;
        write_rows(self.native()?, &dialect, name, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_conn_is_closed() {
        let conn = MysqlConn::default();
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_close_when_closed() {
        let mut conn = MysqlConn::default();
        assert!(matches!(conn.close().await, Err(DriverError::NotOpen)));
    }

    #[tokio::test]
    async fn test_operations_require_open() {
        let mut conn = MysqlConn::default();
        assert!(matches!(
            conn.get_schema("example").await,
            Err(DriverError::NotOpen)
        ));
        assert!(matches!(
            conn.get_rows("example").await,
            Err(DriverError::NotOpen)
        ));
        assert!(matches!(
            conn.set_rows("example", &[]).await,
            Err(DriverError::NotOpen)
        ));
        assert!(matches!(
            conn.set_schema("example", &Schema::new("example")).await,
            Err(DriverError::NotOpen)
        ));
        assert!(matches!(conn.ping().await, Err(DriverError::NotOpen)));
        assert!(matches!(
            conn.use_database("tamatest").await,
            Err(DriverError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_open_invalid_dsn() {
        let mut conn = MysqlConn::default();
        let err = conn.open("not a dsn").await.unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_open_rejects_zero_timeout() {
        let config = DriverConfig {
            connect_timeout_secs: 0,
            ..Default::default()
        };
        let mut conn = MysqlConn::new(config);
        let err = conn.open("root:x@tcp(127.0.0.1:1)/db").await.unwrap_err();
        assert!(matches!(err, DriverError::Config(_)));
        assert!(!conn.is_open());
    }

    #[tokio::test]
    async fn test_open_unreachable_server() {
        let config = DriverConfig {
            connect_timeout_secs: 5,
            ssl_mode: "disable".to_string(),
            ..Default::default()
        };
        let mut conn = MysqlConn::new(config);
        let err = conn.open("root:x@tcp(127.0.0.1:1)/db").await.unwrap_err();
        assert!(matches!(err, DriverError::Connection { .. }));
        assert!(!conn.is_open());
    }
}
