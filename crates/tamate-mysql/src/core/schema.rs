//! Schema metadata types: column types, columns, keys and table schemas.
//!
//! These types are the database-agnostic description of a table that the
//! abstraction layer exchanges with drivers.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DriverError, Result};

/// Generic column type.
///
/// Every native type reported by a database catalog collapses onto one of
/// these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    String,
    Datetime,
    Date,
    Bytes,
    Null,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
            ColumnType::Datetime => "datetime",
            ColumnType::Date => "date",
            ColumnType::Bytes => "bytes",
            ColumnType::Null => "null",
        };
        f.write_str(s)
    }
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Zero-based position within the table.
    pub ordinal_position: usize,

    /// Generic column type.
    #[serde(rename = "type")]
    pub column_type: ColumnType,

    /// Whether the column rejects NULL.
    #[serde(default)]
    pub not_null: bool,

    /// Whether the database assigns values automatically.
    #[serde(default)]
    pub auto_increment: bool,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        ordinal_position: usize,
        column_type: ColumnType,
        not_null: bool,
        auto_increment: bool,
    ) -> Self {
        Self {
            name: name.into(),
            ordinal_position,
            column_type,
            not_null,
            auto_increment,
        }
    }
}

/// Kind of key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    Primary,
}

/// A key over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub key_type: KeyType,

    /// Column names in catalog order.
    pub column_names: Vec<String>,
}

impl Key {
    /// Create an empty primary key.
    pub fn primary() -> Self {
        Self {
            key_type: KeyType::Primary,
            column_names: Vec::new(),
        }
    }

    /// Create a primary key over the given columns.
    pub fn primary_on<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key_type: KeyType::Primary,
            column_names: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Check whether a column belongs to this key.
    pub fn contains(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    pub fn is_composite(&self) -> bool {
        self.column_names.len() > 1
    }
}

/// Stable identity of the key, used as the `GroupByKey` map key.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.key_type {
            KeyType::Primary => "PRIMARY",
        };
        write!(f, "{}({})", kind, self.column_names.join(","))
    }
}

/// Table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Table name.
    pub name: String,

    /// Column definitions, in table order.
    pub columns: Vec<Column>,

    /// Primary key, if the table has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<Key>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: None,
        }
    }

    /// Load a schema definition from a YAML file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let schema: Schema = serde_yaml::from_str(yaml)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Find a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column is part of the primary key.
    pub fn is_primary_key_column(&self, name: &str) -> bool {
        self.primary_key
            .as_ref()
            .map(|pk| pk.contains(name))
            .unwrap_or(false)
    }

    /// Check the schema invariants.
    ///
    /// Column names are unique, ordinal positions are unique and dense from
    /// zero, and every primary key column exists.
    pub fn validate(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(DriverError::InvalidSchema(format!(
                "table {} has no columns",
                self.name
            )));
        }

        let mut names = HashSet::new();
        let mut positions = vec![false; self.columns.len()];
        for col in &self.columns {
            if !names.insert(col.name.as_str()) {
                return Err(DriverError::InvalidSchema(format!(
                    "duplicate column {} in table {}",
                    col.name, self.name
                )));
            }
            match positions.get_mut(col.ordinal_position) {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(DriverError::InvalidSchema(format!(
                        "column {} has ordinal position {} but positions must be unique and within 0..{}",
                        col.name,
                        col.ordinal_position,
                        self.columns.len()
                    )))
                }
            }
        }

        if let Some(pk) = &self.primary_key {
            if pk.column_names.is_empty() {
                return Err(DriverError::InvalidSchema(format!(
                    "primary key of table {} has no columns",
                    self.name
                )));
            }
            for name in &pk.column_names {
                if !names.contains(name.as_str()) {
                    return Err(DriverError::InvalidSchema(format!(
                        "primary key column {} does not exist in table {}",
                        name, self.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example_schema() -> Schema {
        Schema {
            name: "example".to_string(),
            columns: vec![
                Column::new("id", 0, ColumnType::Int, true, false),
                Column::new("name", 1, ColumnType::String, true, false),
            ],
            primary_key: Some(Key::primary_on(["id"])),
        }
    }

    #[test]
    fn test_valid_schema() {
        assert!(example_schema().validate().is_ok());
    }

    #[test]
    fn test_missing_pk_column() {
        let mut schema = example_schema();
        schema.primary_key = Some(Key::primary_on(["missing"]));
        assert!(matches!(
            schema.validate(),
            Err(DriverError::InvalidSchema(_))
        ));
    }

    #[test]
    fn test_ordinal_positions_must_be_dense() {
        let mut schema = example_schema();
        schema.columns[1].ordinal_position = 5;
        assert!(schema.validate().is_err());

        let mut schema = example_schema();
        schema.columns[1].ordinal_position = 0;
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_duplicate_column_names() {
        let mut schema = example_schema();
        schema.columns[1].name = "id".to_string();
        assert!(schema.validate().is_err());
    }

    #[test]
    fn test_empty_schema_rejected() {
        assert!(Schema::new("empty").validate().is_err());
    }

    #[test]
    fn test_key_identity() {
        let key = Key::primary_on(["a", "b"]);
        assert_eq!(key.to_string(), "PRIMARY(a,b)");
        assert!(key.is_composite());
        assert!(key.contains("b"));
        assert!(!key.contains("c"));
    }

    #[test]
    fn test_schema_yaml_shape() {
        let yaml = r#"
name: example
columns:
  - name: id
    ordinal_position: 0
    type: int
    not_null: true
    auto_increment: true
  - name: name
    ordinal_position: 1
    type: string
primary_key:
  key_type: primary
  column_names: [id]
"#;
        let schema = Schema::from_yaml(yaml).unwrap();
        assert_eq!(schema.columns[0].column_type, ColumnType::Int);
        assert!(schema.columns[0].auto_increment);
        assert!(!schema.columns[1].not_null);
        assert!(schema.is_primary_key_column("id"));
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_from_yaml_validates() {
        let yaml = "name: t\ncolumns: []\n";
        assert!(matches!(
            Schema::from_yaml(yaml),
            Err(DriverError::InvalidSchema(_))
        ));
    }
}
