//! Identifier validation and quoting.
//!
//! Table, column and database names cannot be bound as statement
//! parameters, so they are spliced into SQL text. Every identifier goes
//! through [`validate_identifier`] and is wrapped in backticks with embedded
//! backticks doubled.

use crate::error::{DriverError, Result};

/// Maximum identifier length accepted by MySQL.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Validate an identifier.
///
/// Rejects empty names, names containing NUL bytes, names with trailing
/// spaces (MySQL refuses them) and names longer than 64 characters.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(DriverError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(DriverError::InvalidIdentifier(format!(
            "identifier contains null byte: {:?}",
            name
        )));
    }

    if name.ends_with(' ') {
        return Err(DriverError::InvalidIdentifier(format!(
            "identifier ends with a space: {:?}",
            name
        )));
    }

    let len = name.chars().count();
    if len > MAX_IDENTIFIER_LENGTH {
        return Err(DriverError::InvalidIdentifier(format!(
            "identifier exceeds {} characters (got {}): {:?}",
            MAX_IDENTIFIER_LENGTH, len, name
        )));
    }

    Ok(())
}

/// Quote a MySQL identifier using backticks.
///
/// # Examples
///
/// ```
/// use tamate_mysql::core::identifier::quote_ident;
///
/// assert_eq!(quote_ident("users").unwrap(), "`users`");
/// assert_eq!(quote_ident("table`name").unwrap(), "`table``name`");
/// ```
pub fn quote_ident(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}
