/// Connection Management Module
///
/// This module turns a `ConnectionConfig` into one live database session.
/// The SQLite backend maps the classic host/database/credentials tuple onto
/// the file system: `host` names the directory that holds database files and
/// `database` names the file inside it.

use crate::core::{Result, TablekitError};
use rusqlite::OpenFlags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Database name that selects a private in-memory database
pub const IN_MEMORY: &str = ":memory:";

/// Connection settings, fixed once the provider is built
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConnectionConfig {
    /// Directory holding the database files; empty means the working directory
    #[serde(default)]
    pub host: String,
    /// Database file name, or `:memory:`
    pub database: String,
    /// Accepted for DSN compatibility; SQLite has no authentication
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Create the database file when it does not exist yet
    #[serde(default)]
    pub create_if_missing: bool,
}

impl ConnectionConfig {
    /// Creates a config from the four classic connection settings
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        ConnectionConfig {
            host: host.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
            create_if_missing: false,
        }
    }

    /// Config for a private in-memory database
    pub fn in_memory() -> Self {
        ConnectionConfig::new("", IN_MEMORY, "", "")
    }

    /// Allows the database file to be created on connect
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database == IN_MEMORY
    }

    /// Resolves the database file location, `None` for in-memory databases
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        let host = if self.host.is_empty() { "." } else { self.host.as_str() };
        Some(Path::new(host).join(&self.database))
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("create_if_missing", &self.create_if_missing)
            .finish()
    }
}

/// An open database session owned by a single gateway
#[derive(Debug)]
pub struct Connection {
    inner: rusqlite::Connection,
    /// File backing the session (None for in-memory databases)
    path: Option<PathBuf>,
}

impl Connection {
    /// The underlying driver connection
    pub fn raw(&self) -> &rusqlite::Connection {
        &self.inner
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Closes the session, reporting any failure from the driver.
    ///
    /// Dropping a `Connection` also closes it, but silently.
    pub fn close(self) -> Result<()> {
        let path = self.path;
        match self.inner.close() {
            Ok(()) => {
                info!("closed database connection {:?}", path);
                Ok(())
            }
            Err((_conn, e)) => {
                warn!("failed to close database connection {:?}: {}", path, e);
                Err(TablekitError::Connection(format!("Failed to close connection: {}", e)))
            }
        }
    }
}

/// Produces connections from a fixed configuration
#[derive(Debug, Clone)]
pub struct ConnectionProvider {
    config: ConnectionConfig,
}

impl ConnectionProvider {
    pub fn new(config: ConnectionConfig) -> Self {
        ConnectionProvider { config }
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Opens and verifies one connection.
    ///
    /// Makes a single attempt. Fails with `TablekitError::Connection` when the
    /// host directory is unreachable, the database does not exist (unless
    /// `create_if_missing` is set) or the file is not a database.
    pub fn connect(&self) -> Result<Connection> {
        let config = &self.config;
        if !config.username.is_empty() || !config.password.is_empty() {
            debug!("sqlite backend ignores credentials for user {:?}", config.username);
        }

        let (inner, path) = match config.database_path() {
            None => {
                let conn = rusqlite::Connection::open_in_memory()
                    .map_err(|e| TablekitError::Connection(e.to_string()))?;
                (conn, None)
            }
            Some(path) => {
                if !config.host.is_empty() && !Path::new(&config.host).is_dir() {
                    return Err(TablekitError::Connection(format!(
                        "Host {:?} is not reachable",
                        config.host
                    )));
                }
                if config.database.is_empty() {
                    return Err(TablekitError::Connection("No database name given".to_string()));
                }
                // The database must be a plain file name inside the host directory.
                if config.database.contains(&['/', '\\'][..]) || config.database == ".." || config.database == "." {
                    return Err(TablekitError::Connection(format!(
                        "Database name {:?} must not contain a path",
                        config.database
                    )));
                }

                let mut flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX;
                if config.create_if_missing {
                    flags |= OpenFlags::SQLITE_OPEN_CREATE;
                }
                let conn = rusqlite::Connection::open_with_flags(&path, flags).map_err(|e| {
                    TablekitError::Connection(format!("Unknown database {:?}: {}", config.database, e))
                })?;
                (conn, Some(path))
            }
        };

        // The open call is lazy about the file header; reading the schema
        // version forces the handshake before the handle is handed out.
        inner
            .query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| TablekitError::Connection(format!("Handshake failed: {}", e)))?;
        inner
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| TablekitError::Connection(format!("Failed to configure session: {}", e)))?;

        info!("connected to database {:?}", path.as_deref().unwrap_or_else(|| Path::new(IN_MEMORY)));
        Ok(Connection { inner, path })
    }
}

/// Opens one connection for the given configuration
pub fn connect(config: &ConnectionConfig) -> Result<Connection> {
    ConnectionProvider::new(config.clone()).connect()
}
