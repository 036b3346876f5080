//! Row materialization.
//!
//! Each column of the resolved schema gets a [`ScanSlot`] describing the
//! Rust type its values decode into. Slots are chosen once per query from
//! the column's generic type and nullability; decoding dispatches on the
//! slot variant.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnection, MySqlRow};
use sqlx::{Row as _, TypeInfo as _, ValueRef as _};
use tracing::debug;

use crate::core::schema::{Column, ColumnType, Schema};
use crate::core::value::{ColumnValue, Row, Value};
use crate::error::{DriverError, Result};

use super::dialect::MysqlDialect;
use super::introspect::load_schema;

/// Decode target for one column: one variant per (type, nullable) pair.
///
/// Binary columns always decode through the nullable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanSlot {
    Int,
    NullableInt,
    Float,
    NullableFloat,
    Bool,
    NullableBool,
    String,
    NullableString,
    Datetime,
    NullableDatetime,
    Date,
    NullableDate,
    Bytes,
}

impl ScanSlot {
    /// Choose the slot for a column.
    pub fn for_column(column: &Column) -> Result<Self> {
        let nullable = !column.not_null;
        let slot = match (column.column_type, nullable) {
            (ColumnType::Int, false) => ScanSlot::Int,
            (ColumnType::Int, true) => ScanSlot::NullableInt,
            (ColumnType::Float, false) => ScanSlot::Float,
            (ColumnType::Float, true) => ScanSlot::NullableFloat,
            (ColumnType::Bool, false) => ScanSlot::Bool,
            (ColumnType::Bool, true) => ScanSlot::NullableBool,
            (ColumnType::String, false) => ScanSlot::String,
            (ColumnType::String, true) => ScanSlot::NullableString,
            (ColumnType::Datetime, false) => ScanSlot::Datetime,
            (ColumnType::Datetime, true) => ScanSlot::NullableDatetime,
            (ColumnType::Date, false) => ScanSlot::Date,
            (ColumnType::Date, true) => ScanSlot::NullableDate,
            (ColumnType::Bytes, _) => ScanSlot::Bytes,
            (ColumnType::Null, _) => {
                return Err(DriverError::UnsupportedType(format!(
                    "{} (column {})",
                    column.column_type, column.name
                )))
            }
        };
        Ok(slot)
    }

    pub fn is_nullable(&self) -> bool {
        matches!(
            self,
            ScanSlot::NullableInt
                | ScanSlot::NullableFloat
                | ScanSlot::NullableBool
                | ScanSlot::NullableString
                | ScanSlot::NullableDatetime
                | ScanSlot::NullableDate
                | ScanSlot::Bytes
        )
    }

    /// Decode column `idx` of `row`.
    ///
    /// Non-nullable slots reject NULL with a decode error.
    pub fn decode(&self, row: &MySqlRow, idx: usize) -> std::result::Result<Value, sqlx::Error> {
        let value: Value = match self {
            ScanSlot::Int | ScanSlot::NullableInt => decode_int(row, idx)?.into(),
            ScanSlot::Float | ScanSlot::NullableFloat => decode_float(row, idx)?.into(),
            ScanSlot::Bool | ScanSlot::NullableBool => decode_bool(row, idx)?.into(),
            ScanSlot::String | ScanSlot::NullableString => decode_string(row, idx)?.into(),
            ScanSlot::Datetime | ScanSlot::NullableDatetime => {
                row.try_get::<Option<NaiveDateTime>, _>(idx)?.into()
            }
            ScanSlot::Date | ScanSlot::NullableDate => {
                row.try_get::<Option<NaiveDate>, _>(idx)?.into()
            }
            ScanSlot::Bytes => row.try_get::<Option<Vec<u8>>, _>(idx)?.into(),
        };

        if value.is_null() && !self.is_nullable() {
            return Err(sqlx::Error::ColumnDecode {
                index: idx.to_string(),
                source: "unexpected NULL in NOT NULL column".into(),
            });
        }
        Ok(value)
    }
}

fn decode_int(row: &MySqlRow, idx: usize) -> std::result::Result<Option<i64>, sqlx::Error> {
    match row.try_get::<Option<i64>, _>(idx) {
        Ok(v) => Ok(v),
        // Unsigned columns only decode as u64
        Err(err) => match row.try_get::<Option<u64>, _>(idx) {
            Ok(v) => v
                .map(|u| {
                    i64::try_from(u).map_err(|e| sqlx::Error::ColumnDecode {
                        index: idx.to_string(),
                        source: Box::new(e),
                    })
                })
                .transpose(),
            Err(_) => Err(err),
        },
    }
}

fn decode_float(row: &MySqlRow, idx: usize) -> std::result::Result<Option<f64>, sqlx::Error> {
    match row.try_get::<Option<f64>, _>(idx) {
        Ok(v) => Ok(v),
        Err(err) => {
            if let Ok(v) = row.try_get::<Option<f32>, _>(idx) {
                return Ok(v.map(f64::from));
            }
            // DECIMAL columns
            match row.try_get::<Option<Decimal>, _>(idx) {
                Ok(v) => Ok(v.and_then(|d| d.to_f64())),
                Err(_) => Err(err),
            }
        }
    }
}

fn decode_bool(row: &MySqlRow, idx: usize) -> std::result::Result<Option<bool>, sqlx::Error> {
    match row.try_get::<Option<bool>, _>(idx) {
        Ok(v) => Ok(v),
        Err(err) => match row.try_get::<Option<i64>, _>(idx) {
            Ok(v) => Ok(v.map(|i| i != 0)),
            Err(_) => Err(err),
        },
    }
}

/// MySQL reports JSON result columns with their own type, which sqlx
/// accepts for neither `String` nor `Vec<u8>`.
fn is_json_type(type_name: &str) -> bool {
    type_name.eq_ignore_ascii_case("JSON")
}

fn decode_string(row: &MySqlRow, idx: usize) -> std::result::Result<Option<String>, sqlx::Error> {
    let json = is_json_type(row.try_get_raw(idx)?.type_info().name());
    if json {
        // The payload is UTF-8 text
        return row.try_get_unchecked::<Option<String>, _>(idx);
    }

    match row.try_get::<Option<String>, _>(idx) {
        Ok(v) => Ok(v),
        // Binary-collated text arrives as bytes
        Err(err) => match row.try_get::<Option<Vec<u8>>, _>(idx) {
            Ok(v) => v
                .map(|b| {
                    String::from_utf8(b).map_err(|e| sqlx::Error::ColumnDecode {
                        index: idx.to_string(),
                        source: Box::new(e),
                    })
                })
                .transpose(),
            Err(_) => Err(err),
        },
    }
}

/// Decodes result rows of a select-all built from one schema.
#[derive(Debug)]
pub struct RowDecoder<'a> {
    schema: &'a Schema,
    columns: Vec<(Arc<Column>, ScanSlot)>,
}

impl<'a> RowDecoder<'a> {
    pub fn new(schema: &'a Schema) -> Result<Self> {
        let columns = schema
            .columns
            .iter()
            .map(|c| Ok((Arc::new(c.clone()), ScanSlot::for_column(c)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { schema, columns })
    }

    pub fn slots(&self) -> impl Iterator<Item = ScanSlot> + '_ {
        self.columns.iter().map(|(_, slot)| *slot)
    }

    /// Decode one result row. Columns are read by position, matching the
    /// select list order.
    pub fn decode(&self, row: &MySqlRow) -> Result<Row> {
        let values = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, (column, slot))| {
                let value = slot.decode(row, idx).map_err(|e| DriverError::Decode {
                    column: column.name.clone(),
                    source: e,
                })?;
                Ok(ColumnValue::new(column.clone(), value))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Row::from_column_values(
            values,
            self.schema.primary_key.as_ref(),
        ))
    }
}

/// Read every row of `table`.
pub async fn load_rows(
    conn: &mut MySqlConnection,
    dialect: &MysqlDialect,
    table: &str,
) -> Result<Vec<Row>> {
    let schema = load_schema(conn, dialect, table).await?;
    let decoder = RowDecoder::new(&schema)?;
    let sql = dialect.select_all(table, &schema)?;

    let result: Vec<MySqlRow> = sqlx::query(&sql)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| DriverError::statement(e, format!("selecting rows from {}", table)))?;

    let rows = result
        .iter()
        .map(|r| decoder.decode(r))
        .collect::<Result<Vec<_>>>()?;

    debug!("Read {} rows from {}", rows.len(), table);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::Key;

    #[test]
    fn test_slot_per_type_and_nullability() {
        let cases = [
            (ColumnType::Int, true, ScanSlot::Int),
            (ColumnType::Int, false, ScanSlot::NullableInt),
            (ColumnType::Float, true, ScanSlot::Float),
            (ColumnType::Float, false, ScanSlot::NullableFloat),
            (ColumnType::Bool, true, ScanSlot::Bool),
            (ColumnType::Bool, false, ScanSlot::NullableBool),
            (ColumnType::String, true, ScanSlot::String),
            (ColumnType::String, false, ScanSlot::NullableString),
            (ColumnType::Datetime, true, ScanSlot::Datetime),
            (ColumnType::Datetime, false, ScanSlot::NullableDatetime),
            (ColumnType::Date, true, ScanSlot::Date),
            (ColumnType::Date, false, ScanSlot::NullableDate),
            (ColumnType::Bytes, true, ScanSlot::Bytes),
            (ColumnType::Bytes, false, ScanSlot::Bytes),
        ];

        for (ty, not_null, expected) in cases {
            let col = Column::new("c", 0, ty, not_null, false);
            assert_eq!(ScanSlot::for_column(&col).unwrap(), expected, "{:?}", ty);
            assert_eq!(expected.is_nullable(), !not_null || ty == ColumnType::Bytes);
        }
    }

    #[test]
    fn test_json_columns_take_the_text_path() {
        assert!(is_json_type("JSON"));
        assert!(is_json_type("json"));
        for name in ["VARCHAR", "TEXT", "BLOB", "VARBINARY", "CHAR"] {
            assert!(!is_json_type(name), "{}", name);
        }
    }

    #[test]
    fn test_null_type_has_no_slot() {
        let col = Column::new("nothing", 0, ColumnType::Null, false, false);
        assert!(matches!(
            ScanSlot::for_column(&col),
            Err(DriverError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_decoder_follows_schema_order() {
        let schema = Schema {
            name: "example".to_string(),
            columns: vec![
                Column::new("id", 0, ColumnType::Int, true, false),
                Column::new("name", 1, ColumnType::String, false, false),
            ],
            primary_key: Some(Key::primary_on(["id"])),
        };

        let decoder = RowDecoder::new(&schema).unwrap();
        let slots: Vec<ScanSlot> = decoder.slots().collect();
        assert_eq!(slots, vec![ScanSlot::Int, ScanSlot::NullableString]);
    }
}
