//! Type mapping between MySQL column types and [`ColumnType`].
//!
//! The forward direction is lossy: many native types collapse onto one
//! generic type. The reverse direction produces one canonical native type per
//! generic type, so `generic_to_native(native_to_generic(t))` is not `t` in
//! general.

use crate::core::schema::ColumnType;
use crate::error::{DriverError, Result};

/// Prefix rules, checked in order. The first matching prefix wins, so more
/// specific prefixes must come first (`tinyint(1)` before `tinyint`,
/// `datetime` before `date`).
const NATIVE_RULES: &[(&[&str], ColumnType)] = &[
    (&["tinyint(1)", "bool"], ColumnType::Bool),
    (
        &["int", "smallint", "mediumint", "bigint", "tinyint"],
        ColumnType::Int,
    ),
    (&["float", "double", "decimal"], ColumnType::Float),
    (
        &[
            "char",
            "varchar",
            "text",
            "tinytext",
            "mediumtext",
            "longtext",
            "json",
        ],
        ColumnType::String,
    ),
    (&["datetime", "timestamp"], ColumnType::Datetime),
    (&["date"], ColumnType::Date),
    (
        &["blob", "tinyblob", "mediumblob", "longblob"],
        ColumnType::Bytes,
    ),
];

/// Map a MySQL `COLUMN_TYPE` (e.g. `int(11) unsigned`, `varchar(255)`) to a
/// generic column type.
pub fn native_to_generic(native: &str) -> Result<ColumnType> {
    let lower = native.trim().to_lowercase();
    NATIVE_RULES
        .iter()
        .find(|(prefixes, _)| prefixes.iter().any(|p| lower.starts_with(p)))
        .map(|(_, ty)| *ty)
        .ok_or_else(|| DriverError::UnsupportedType(native.to_string()))
}

/// Map a generic column type to its canonical MySQL type.
pub fn generic_to_native(column_type: ColumnType) -> Result<&'static str> {
    match column_type {
        ColumnType::Int => Ok("INT"),
        ColumnType::Float => Ok("FLOAT"),
        ColumnType::Bool => Ok("BOOLEAN"),
        ColumnType::Datetime => Ok("DATETIME"),
        ColumnType::Date => Ok("DATE"),
        ColumnType::String => Ok("TEXT"),
        ColumnType::Bytes => Ok("BLOB"),
        ColumnType::Null => Err(DriverError::UnsupportedType(column_type.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_types() {
        for t in ["int", "int(11)", "INT UNSIGNED", "smallint(6)", "mediumint", "bigint(20)"] {
            assert_eq!(native_to_generic(t).unwrap(), ColumnType::Int, "{}", t);
        }
        assert_eq!(native_to_generic("tinyint(4)").unwrap(), ColumnType::Int);
    }

    #[test]
    fn test_bool_types() {
        assert_eq!(native_to_generic("tinyint(1)").unwrap(), ColumnType::Bool);
        assert_eq!(native_to_generic("boolean").unwrap(), ColumnType::Bool);
    }

    #[test]
    fn test_float_types() {
        assert_eq!(native_to_generic("float").unwrap(), ColumnType::Float);
        assert_eq!(native_to_generic("double").unwrap(), ColumnType::Float);
        assert_eq!(native_to_generic("decimal(10,2)").unwrap(), ColumnType::Float);
    }

    #[test]
    fn test_string_types() {
        for t in ["char(3)", "varchar(100)", "text", "tinytext", "mediumtext", "longtext", "json"] {
            assert_eq!(native_to_generic(t).unwrap(), ColumnType::String, "{}", t);
        }
    }

    #[test]
    fn test_datetime_before_date() {
        assert_eq!(native_to_generic("datetime").unwrap(), ColumnType::Datetime);
        assert_eq!(native_to_generic("datetime(6)").unwrap(), ColumnType::Datetime);
        assert_eq!(native_to_generic("timestamp").unwrap(), ColumnType::Datetime);
        assert_eq!(native_to_generic("date").unwrap(), ColumnType::Date);
    }

    #[test]
    fn test_bytes_types() {
        for t in ["blob", "tinyblob", "mediumblob", "longblob"] {
            assert_eq!(native_to_generic(t).unwrap(), ColumnType::Bytes, "{}", t);
        }
    }

    #[test]
    fn test_unsupported_native_type() {
        for t in ["geometry", "enum('a','b')", "time", "year", "varbinary(16)", ""] {
            match native_to_generic(t) {
                Err(DriverError::UnsupportedType(s)) => assert_eq!(s, t),
                other => panic!("expected UnsupportedType for {:?}, got {:?}", t, other),
            }
        }
    }

    #[test]
    fn test_generic_to_native() {
        assert_eq!(generic_to_native(ColumnType::Int).unwrap(), "INT");
        assert_eq!(generic_to_native(ColumnType::Float).unwrap(), "FLOAT");
        assert_eq!(generic_to_native(ColumnType::Bool).unwrap(), "BOOLEAN");
        assert_eq!(generic_to_native(ColumnType::Datetime).unwrap(), "DATETIME");
        assert_eq!(generic_to_native(ColumnType::Date).unwrap(), "DATE");
        assert_eq!(generic_to_native(ColumnType::String).unwrap(), "TEXT");
        assert_eq!(generic_to_native(ColumnType::Bytes).unwrap(), "BLOB");
        assert!(matches!(
            generic_to_native(ColumnType::Null),
            Err(DriverError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_canonical_types_map_back() {
        // MySQL reports BOOLEAN as tinyint(1); every other canonical name
        // maps straight back.
        for ty in [
            ColumnType::Int,
            ColumnType::Float,
            ColumnType::Datetime,
            ColumnType::Date,
            ColumnType::String,
            ColumnType::Bytes,
        ] {
            let native = generic_to_native(ty).unwrap();
            assert_eq!(native_to_generic(native).unwrap(), ty);
        }
        assert_eq!(native_to_generic("tinyint(1)").unwrap(), ColumnType::Bool);
    }
}
