//! Schema introspection from INFORMATION_SCHEMA.
//!
//! [`load_schema`] runs the catalog query; [`SchemaBuilder`] turns the
//! returned records into a [`Schema`] and holds all the interpretation rules.

use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::Row as _;
use tracing::debug;

use crate::core::schema::{Column, Key, Schema};
use crate::error::{DriverError, Result};

use super::dialect::MysqlDialect;
use super::typemap::native_to_generic;

/// One INFORMATION_SCHEMA.COLUMNS record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogColumn {
    pub column_name: String,
    /// One-based, as reported by the catalog.
    pub ordinal_position: i64,
    pub column_type: String,
    pub column_key: String,
    pub is_nullable: String,
    pub extra: String,
}

impl CatalogColumn {
    fn from_row(row: &MySqlRow) -> Result<Self> {
        let get = |name: &str| -> Result<String> {
            row.try_get::<Option<String>, _>(name)
                .map(Option::unwrap_or_default)
                .map_err(|e| DriverError::Decode {
                    column: name.to_string(),
                    source: e,
                })
        };

        Ok(Self {
            column_name: get("COLUMN_NAME")?,
            ordinal_position: row.try_get::<i64, _>("ORDINAL_POSITION").map_err(|e| {
                DriverError::Decode {
                    column: "ORDINAL_POSITION".to_string(),
                    source: e,
                }
            })?,
            column_type: get("COLUMN_TYPE")?,
            column_key: get("COLUMN_KEY")?,
            is_nullable: get("IS_NULLABLE")?,
            extra: get("EXTRA")?,
        })
    }
}

/// Assembles a [`Schema`] from catalog records in the order they arrive.
#[derive(Debug)]
pub struct SchemaBuilder {
    table: String,
    schema: Option<Schema>,
}

impl SchemaBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
        }
    }

    /// Add one catalog record.
    pub fn push(&mut self, record: &CatalogColumn) -> Result<()> {
        let column_type = native_to_generic(&record.column_type)?;
        let ordinal_position = usize::try_from(record.ordinal_position - 1).map_err(|_| {
            DriverError::InvalidSchema(format!(
                "column {} of table {} has ordinal position {}",
                record.column_name, self.table, record.ordinal_position
            ))
        })?;

        let table = &self.table;
        let schema = self.schema.get_or_insert_with(|| Schema::new(table.clone()));

        if record.column_key.contains("PRI") {
            schema
                .primary_key
                .get_or_insert_with(Key::primary)
                .column_names
                .push(record.column_name.clone());
        }

        schema.columns.push(Column {
            name: record.column_name.clone(),
            ordinal_position,
            column_type,
            not_null: record.is_nullable != "YES",
            auto_increment: record.extra.contains("auto_increment"),
        });

        Ok(())
    }

    /// Finish the schema; no records means the table does not exist.
    pub fn finish(self) -> Result<Schema> {
        self.schema
            .ok_or(DriverError::SchemaNotFound(self.table))
    }
}

/// Describe `table` in the connection's current database.
pub async fn load_schema(
    conn: &mut MySqlConnection,
    dialect: &MysqlDialect,
    table: &str,
) -> Result<Schema> {
    let rows: Vec<MySqlRow> = sqlx::query(dialect.catalog_query())
        .bind(table)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DriverError::statement(e, format!("loading catalog for {}", table)))?;

    let mut builder = SchemaBuilder::new(table);
    for row in &rows {
        builder.push(&CatalogColumn::from_row(row)?)?;
    }
    let schema = builder.finish()?;

    debug!(
        "Loaded schema for {}: {} columns, primary key {:?}",
        table,
        schema.columns.len(),
        schema.primary_key.as_ref().map(|pk| &pk.column_names)
    );
    Ok(schema)
}
