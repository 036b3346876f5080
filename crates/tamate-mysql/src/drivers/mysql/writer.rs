//! Schema and row writing.
//!
//! Both operations are destructive and non-transactional: the table is
//! dropped and recreated, then rows are inserted one statement at a time.

use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection};
use sqlx::query::Query;
use tracing::{debug, info, warn};

use crate::core::schema::Schema;
use crate::core::value::{Row, Value};
use crate::error::{DriverError, Result};

use super::dialect::MysqlDialect;
use super::introspect::load_schema;

/// Execute one statement that returns no rows.
pub(crate) async fn execute(conn: &mut MySqlConnection, sql: &str, context: &str) -> Result<u64> {
    debug!("Executing: {}", sql);
    let result = sqlx::query(sql)
        .execute(&mut *conn)
        .await
        .map_err(|e| DriverError::statement(e, context))?;
    Ok(result.rows_affected())
}

/// Drop `table` and create it from `schema`.
pub async fn write_schema(
    conn: &mut MySqlConnection,
    dialect: &MysqlDialect,
    table: &str,
    schema: &Schema,
) -> Result<()> {
    schema.validate()?;
    if schema.name != table {
        warn!(
            "Schema '{}' written under table name '{}'",
            schema.name, table
        );
    }

    // Build both statements before touching the table
    let drop_sql = dialect.drop_table(table)?;
    let create_sql = dialect.create_table(table, schema)?;

    execute(conn, &drop_sql, &format!("dropping table {}", table)).await?;
    execute(conn, &create_sql, &format!("creating table {}", table)).await?;

    info!(
        "Created table {} with {} columns",
        table,
        schema.columns.len()
    );
    Ok(())
}

/// Replace the contents of `table` with `rows`.
///
/// The table's current schema is read from the catalog and every row is
/// checked against it; a row that cannot fit leaves the table untouched.
/// The table is then recreated and rows are inserted in order. The first
/// failed insert stops the sequence with [`DriverError::PartialWrite`].
pub async fn write_rows(
    conn: &mut MySqlConnection,
    dialect: &MysqlDialect,
    table: &str,
    rows: &[Row],
) -> Result<()> {
    let schema = load_schema(conn, dialect, table).await?;
    check_rows(&schema, rows)?;
    write_schema(conn, dialect, table, &schema).await?;

    let total = rows.len();
    for (inserted, row) in rows.iter().enumerate() {
        if let Err(e) = insert_row(conn, dialect, table, row).await {
            warn!(
                "Insert into {} failed after {} of {} rows: {}",
                table, inserted, total, e
            );
            return Err(DriverError::PartialWrite {
                table: table.to_string(),
                inserted,
                total,
                source: Box::new(e),
            });
        }
    }

    info!("Wrote {} rows to {}", total, table);
    Ok(())
}

/// Insert one row whose values were already checked.
async fn insert_row(
    conn: &mut MySqlConnection,
    dialect: &MysqlDialect,
    table: &str,
    row: &Row,
) -> Result<()> {
    let sql = dialect.insert_row(table, row)?;
    let query = row
        .ordered_values()
        .into_iter()
        .fold(sqlx::query(&sql), |q, cv| bind_value(q, &cv.value));

    query
        .execute(&mut *conn)
        .await
        .map_err(|e| DriverError::statement(e, format!("inserting into {}", table)))?;
    Ok(())
}

/// Check every row before anything is written.
fn check_rows(schema: &Schema, rows: &[Row]) -> Result<()> {
    for (idx, row) in rows.iter().enumerate() {
        if row.values().is_empty() {
            return Err(DriverError::invalid_value(
                "",
                format!("row {} for table {} has no values", idx, schema.name),
            ));
        }
        check_row(schema, row).map_err(|e| match e {
            DriverError::InvalidValue { column, message } => {
                DriverError::invalid_value(column, format!("row {}: {}", idx, message))
            }
            other => other,
        })?;
    }
    Ok(())
}

/// Every value must name an existing column and fit its type and
/// nullability. Columns absent from the row are left to the database.
fn check_row(schema: &Schema, row: &Row) -> Result<()> {
    for (name, cv) in row.values() {
        let column = schema.column(name).ok_or_else(|| {
            DriverError::invalid_value(name, format!("no such column in table {}", schema.name))
        })?;
        if !cv.value.conforms_to(column) {
            return Err(DriverError::invalid_value(
                name,
                format!(
                    "{} value does not fit {}{} column",
                    cv.value.column_type(),
                    if column.not_null { "NOT NULL " } else { "" },
                    column.column_type
                ),
            ));
        }
    }
    Ok(())
}

/// Bind a value as the next positional parameter.
fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Int(i) => query.bind(*i),
        Value::Float(f) => query.bind(*f),
        Value::Bool(b) => query.bind(*b),
        Value::String(s) => query.bind(s.clone()),
        Value::Datetime(dt) => query.bind(*dt),
        Value::Date(d) => query.bind(*d),
        Value::Bytes(b) => query.bind(b.clone()),
    }
}
