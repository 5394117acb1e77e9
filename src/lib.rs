// Core infrastructure modules
pub mod core;

// Feature-specific modules
pub mod config;
pub mod crud;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the public API
pub use crate::core::db::{
    connect, Connection, ConnectionConfig, ConnectionProvider, Record, RowSet, Value,
};
pub use crate::core::{Result, TablekitError};
pub use crud::{CrudGateway, ExecutionResult, Predicate, SqlStatement};
