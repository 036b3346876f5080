//! Error types for the driver.

use thiserror::Error;

/// Main error type for driver operations.
#[derive(Error, Debug)]
pub enum DriverError {
    /// Opening or pinging the database failed.
    #[error("Connection error: {context}")]
    Connection {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// Operation attempted on a closed connection.
    #[error("Connection is not open")]
    NotOpen,

    /// `open` called on a connection that is already open.
    #[error("Connection is already open")]
    AlreadyOpen,

    /// The catalog returned no columns for the requested table.
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    /// A column type cannot be translated in either direction.
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// A SQL statement failed to execute.
    #[error("Statement failed ({context})")]
    Statement {
        context: String,
        #[source]
        source: sqlx::Error,
    },

    /// An insert failed part way through `set_rows`.
    #[error("Partial write to table {table}: {inserted} of {total} rows inserted")]
    PartialWrite {
        table: String,
        inserted: usize,
        total: usize,
        #[source]
        source: Box<DriverError>,
    },

    /// A result value could not be decoded into its scan slot.
    #[error("Failed to decode column {column}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    /// Schema violates one of its invariants.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A row value does not fit its column definition.
    #[error("Invalid value for column {column}: {message}")]
    InvalidValue { column: String, message: String },

    /// Identifier rejected before being spliced into SQL.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// No driver registered under the requested name.
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    /// A driver with this name is already registered.
    #[error("Driver already registered: {0}")]
    DuplicateDriver(String),

    /// Configuration error (bad DSN, invalid YAML values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DriverError {
    /// Create a Connection error with context about where it occurred
    pub fn connection(source: sqlx::Error, context: impl Into<String>) -> Self {
        DriverError::Connection {
            context: context.into(),
            source,
        }
    }

    /// Create a Statement error
    pub fn statement(source: sqlx::Error, context: impl Into<String>) -> Self {
        DriverError::Statement {
            context: context.into(),
            source,
        }
    }

    /// Create an InvalidValue error
    pub fn invalid_value(column: impl Into<String>, message: impl Into<String>) -> Self {
        DriverError::InvalidValue {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }

    /// Process exit code for the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            DriverError::Config(_) | DriverError::Io(_) | DriverError::Yaml(_) => 2,
            DriverError::Connection { .. } => 3,
            DriverError::SchemaNotFound(_) => 4,
            _ => 1,
        }
    }
}

/// Result type alias for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detailed_includes_chain() {
        let err = DriverError::PartialWrite {
            table: "example".to_string(),
            inserted: 1,
            total: 3,
            source: Box::new(DriverError::invalid_value("id", "NULL in NOT NULL column")),
        };

        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: Partial write to table example: 1 of 3 rows inserted"));
        assert!(detailed.contains("Caused by:\n  1: Invalid value for column id"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(DriverError::Config("bad".into()).exit_code(), 2);
        assert_eq!(DriverError::SchemaNotFound("t".into()).exit_code(), 4);
        assert_eq!(DriverError::NotOpen.exit_code(), 1);
    }
}
