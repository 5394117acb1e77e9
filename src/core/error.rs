/// Tablekit Error Module
///
/// This module defines the single error type returned by every connection
/// and CRUD operation. Each stage of a statement's life (connect, prepare,
/// bind, execute) has its own variant so callers can tell them apart.
use thiserror::Error;

/// Error type for the tablekit crate.
///
/// Covers:
/// - Connection setup (unreachable host, unknown database, bad handshake)
/// - Statement preparation, parameter binding and execution
/// - Caller input rejected before any SQL is built
/// - Configuration loading
#[derive(Error, Debug)]
pub enum TablekitError {
    /// The database session could not be opened or verified
    #[error("Connection error: {0}")]
    Connection(String),

    /// The driver refused to prepare the generated SQL
    #[error("Prepare error: {0}")]
    Prepare(String),

    /// A value could not be bound to its placeholder
    #[error("Bind error: {0}")]
    Bind(String),

    /// The prepared statement failed while running or reading rows
    #[error("Execution error: {0}")]
    Execution(String),

    /// A table or column name failed identifier validation
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// An operation that needs at least one column was given none
    #[error("Empty data for {0}: at least one column is required")]
    EmptyData(String),

    /// A predicate cannot be compiled into a WHERE clause
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result to use TablekitError as the error type.
pub type Result<T> = std::result::Result<T, TablekitError>;
