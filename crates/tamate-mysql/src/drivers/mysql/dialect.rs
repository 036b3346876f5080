//! MySQL/MariaDB statement generation.
//!
//! Pure string builders for every statement the driver executes. Values are
//! never spliced into SQL: they are bound through `?` placeholders. Identifiers
//! are validated and backtick-quoted.

use crate::core::identifier::quote_ident;
use crate::core::schema::{ColumnType, Schema};
use crate::core::value::Row;
use crate::error::{DriverError, Result};

use super::typemap::generic_to_native;

/// Column type used for String columns that are part of the primary key.
///
/// MySQL cannot index TEXT without a prefix length.
const STRING_KEY_TYPE: &str = "VARCHAR(255)";

/// Catalog query describing the columns of one table in the current
/// database. Binds one parameter: the table name.
///
/// Text columns are CAST to CHAR because some server collations report
/// INFORMATION_SCHEMA text as VARBINARY.
const CATALOG_QUERY: &str = "SELECT \
    CAST(COLUMN_NAME AS CHAR(255)) AS COLUMN_NAME, \
    CAST(ORDINAL_POSITION AS SIGNED) AS ORDINAL_POSITION, \
    CAST(COLUMN_TYPE AS CHAR(4096)) AS COLUMN_TYPE, \
    CAST(COLUMN_KEY AS CHAR(16)) AS COLUMN_KEY, \
    CAST(IS_NULLABLE AS CHAR(3)) AS IS_NULLABLE, \
    CAST(EXTRA AS CHAR(255)) AS EXTRA \
    FROM INFORMATION_SCHEMA.COLUMNS \
    WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?";

/// MySQL/MariaDB dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &str {
        "mysql"
    }

    /// Query returning `COLUMN_NAME, ORDINAL_POSITION, COLUMN_TYPE,
    /// COLUMN_KEY, IS_NULLABLE, EXTRA` for the table bound to `?`.
    pub fn catalog_query(&self) -> &'static str {
        CATALOG_QUERY
    }

    pub fn create_database(&self, name: &str) -> Result<String> {
        Ok(format!("CREATE DATABASE {}", quote_ident(name)?))
    }

    pub fn drop_database(&self, name: &str) -> Result<String> {
        Ok(format!("DROP DATABASE IF EXISTS {}", quote_ident(name)?))
    }

    pub fn use_database(&self, name: &str) -> Result<String> {
        Ok(format!("USE {}", quote_ident(name)?))
    }

    /// Build `CREATE TABLE` for `schema` under the name `table`.
    ///
    /// Columns are emitted in `schema.columns` order. A single-column primary
    /// key is declared inline; a composite key gets a trailing
    /// `PRIMARY KEY (...)` clause.
    pub fn create_table(&self, table: &str, schema: &Schema) -> Result<String> {
        if schema.columns.is_empty() {
            return Err(DriverError::InvalidSchema(format!(
                "table {} has no columns",
                table
            )));
        }

        let composite_key = schema
            .primary_key
            .as_ref()
            .filter(|pk| pk.is_composite());

        let mut defs = Vec::with_capacity(schema.columns.len() + 1);
        for col in &schema.columns {
            let in_key = schema.is_primary_key_column(&col.name);
            let native = if in_key && col.column_type == ColumnType::String {
                STRING_KEY_TYPE
            } else {
                generic_to_native(col.column_type)?
            };

            let mut def = format!("{} {}", quote_ident(&col.name)?, native);
            if in_key && composite_key.is_none() {
                def.push_str(" PRIMARY KEY");
            }
            if col.not_null {
                def.push_str(" NOT NULL");
            }
            if col.auto_increment {
                def.push_str(" AUTO_INCREMENT");
            }
            defs.push(def);
        }

        if let Some(pk) = composite_key {
            let cols = pk
                .column_names
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Result<Vec<_>>>()?;
            defs.push(format!("PRIMARY KEY ({})", cols.join(", ")));
        }

        Ok(format!(
            "CREATE TABLE {} ({})",
            quote_ident(table)?,
            defs.join(", ")
        ))
    }

    pub fn drop_table(&self, table: &str) -> Result<String> {
        Ok(format!("DROP TABLE IF EXISTS {}", quote_ident(table)?))
    }

    /// Build a `SELECT` of every column of `schema`, in schema order.
    pub fn select_all(&self, table: &str, schema: &Schema) -> Result<String> {
        if schema.columns.is_empty() {
            return Err(DriverError::InvalidSchema(format!(
                "table {} has no columns",
                table
            )));
        }

        let cols = schema
            .columns
            .iter()
            .map(|c| quote_ident(&c.name))
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "SELECT {} FROM {}",
            cols.join(", "),
            quote_ident(table)?
        ))
    }

    /// Build an `INSERT` for the columns present in `row`, ordered by
    /// ordinal position. Bind values with [`Row::ordered_values`].
    pub fn insert_row(&self, table: &str, row: &Row) -> Result<String> {
        let names = row.column_names();
        if names.is_empty() {
            return Err(DriverError::InvalidValue {
                column: String::new(),
                message: format!("row for table {} has no values", table),
            });
        }

        let cols = names
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Result<Vec<_>>>()?;

        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            quote_ident(table)?,
            cols.join(", "),
            vec!["?"; cols.len()].join(", ")
        ))
    }
}
