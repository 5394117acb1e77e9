/// Identifier Module
///
/// Validation for table and column names. Identifiers are interpolated into
/// SQL text rather than bound, so only plain names are let through.

use crate::core::{Result, TablekitError};
use once_cell::sync::Lazy;
use regex::Regex;

static COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid column pattern"));

static TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$").expect("valid table pattern")
});

/// Checks a table name, optionally schema-qualified (`main.users`)
pub fn validate_table(name: &str) -> Result<&str> {
    if TABLE_RE.is_match(name) {
        Ok(name)
    } else {
        Err(TablekitError::InvalidIdentifier(name.to_string()))
    }
}

/// Checks a column name
pub fn validate_column(name: &str) -> Result<&str> {
    if COLUMN_RE.is_match(name) {
        Ok(name)
    } else {
        Err(TablekitError::InvalidIdentifier(name.to_string()))
    }
}
