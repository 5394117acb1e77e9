/// Core Module for tablekit
///
/// Shared infrastructure used by the CRUD layer: the error type, the
/// connection wrapper and the dynamically typed values that flow between
/// callers and the driver.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, TablekitError};
