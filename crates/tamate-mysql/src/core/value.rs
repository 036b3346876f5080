//! Value and row types exchanged with the abstraction layer.
//!
//! A [`Row`] is immutable once built: its [`GroupByKey`] index is derived
//! from the values and the primary key in [`Row::new`] and never updated
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::schema::{Column, ColumnType, Key};

/// Dynamically typed scalar value.
///
/// Serializes as plain JSON scalars. That form cannot tell a date from a
/// string, so values are output only.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,

    Int(i64),

    Float(f64),

    Bool(bool),

    String(String),

    /// Timestamp without timezone.
    Datetime(NaiveDateTime),

    /// Date without time component.
    Date(NaiveDate),

    Bytes(Vec<u8>),
}

impl Value {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Generic type carried by this value (`Null` for NULL).
    #[must_use]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Null => ColumnType::Null,
            Value::Int(_) => ColumnType::Int,
            Value::Float(_) => ColumnType::Float,
            Value::Bool(_) => ColumnType::Bool,
            Value::String(_) => ColumnType::String,
            Value::Datetime(_) => ColumnType::Datetime,
            Value::Date(_) => ColumnType::Date,
            Value::Bytes(_) => ColumnType::Bytes,
        }
    }

    /// Check that the value is consistent with a column definition.
    ///
    /// NULL fits any nullable column; otherwise the value type must match
    /// the column type exactly.
    #[must_use]
    pub fn conforms_to(&self, column: &Column) -> bool {
        match self {
            Value::Null => !column.not_null,
            v => v.column_type() == column.column_type,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Datetime(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A value paired with the column it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnValue {
    pub column: Arc<Column>,
    pub value: Value,
}

impl ColumnValue {
    pub fn new(column: Arc<Column>, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Column name to value.
pub type RowValues = HashMap<String, ColumnValue>;

/// Key identity to the key's column values, in key column order.
pub type GroupByKey = HashMap<String, Vec<ColumnValue>>;

/// One table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    values: RowValues,
    group_by_key: GroupByKey,
}

impl Row {
    /// Build a row and derive its primary-key index.
    ///
    /// Key columns missing from `values` are skipped, so a row that carries
    /// only part of a composite key yields a shorter sequence.
    pub fn new(values: RowValues, primary_key: Option<&Key>) -> Self {
        let mut group_by_key = GroupByKey::new();
        if let Some(pk) = primary_key {
            let key_values: Vec<ColumnValue> = pk
                .column_names
                .iter()
                .filter_map(|name| values.get(name).cloned())
                .collect();
            if !key_values.is_empty() {
                group_by_key.insert(pk.to_string(), key_values);
            }
        }

        Self {
            values,
            group_by_key,
        }
    }

    /// Build a row from column values, keyed by their column names.
    pub fn from_column_values<I>(values: I, primary_key: Option<&Key>) -> Self
    where
        I: IntoIterator<Item = ColumnValue>,
    {
        let values = values
            .into_iter()
            .map(|cv| (cv.column.name.clone(), cv))
            .collect();
        Self::new(values, primary_key)
    }

    pub fn values(&self) -> &RowValues {
        &self.values
    }

    pub fn group_by_key(&self) -> &GroupByKey {
        &self.group_by_key
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column).map(|cv| &cv.value)
    }

    /// Values ordered by their column's ordinal position.
    pub fn ordered_values(&self) -> Vec<&ColumnValue> {
        let mut ordered: Vec<&ColumnValue> = self.values.values().collect();
        ordered.sort_by(|a, b| {
            a.column
                .ordinal_position
                .cmp(&b.column.ordinal_position)
                .then_with(|| a.column.name.cmp(&b.column.name))
        });
        ordered
    }

    /// Column names ordered by ordinal position.
    pub fn column_names(&self) -> Vec<&str> {
        self.ordered_values()
            .into_iter()
            .map(|cv| cv.column.name.as_str())
            .collect()
    }

    pub fn into_values(self) -> RowValues {
        self.values
    }
}
