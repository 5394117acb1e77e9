/// # Test Utilities Module
///
/// Fixtures for unit tests: each fixture owns a temporary directory acting
/// as the database "host", so tests never share a database file.

use crate::core::db::ConnectionConfig;
use crate::core::{Result, TablekitError};
use crate::crud::CrudGateway;
use std::sync::Once;
use tempfile::TempDir;

const USERS_SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        age INTEGER
    );
";

static TRACING: Once = Once::new();

/// Routes tracing output through the test harness once per process
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// Isolated database test fixture
pub struct DatabaseFixture {
    pub config: ConnectionConfig,
    // Held so the directory outlives the fixture's connections.
    _dir: TempDir,
}

impl DatabaseFixture {
    /// Creates an empty database file in a fresh temporary directory
    pub fn new() -> Result<Self> {
        init_tracing();
        let dir = tempfile::tempdir()?;
        let host = dir
            .path()
            .to_str()
            .ok_or_else(|| TablekitError::Config("temp dir is not valid UTF-8".to_string()))?
            .to_string();
        let config = ConnectionConfig::new(host, "test.db", "tester", "").create_if_missing(true);
        Ok(DatabaseFixture { config, _dir: dir })
    }

    /// Creates a fixture with an empty `users` table
    pub fn with_users() -> Result<Self> {
        let fixture = DatabaseFixture::new()?;
        let gateway = fixture.gateway()?;
        gateway
            .connection()
            .raw()
            .execute_batch(USERS_SCHEMA)
            .map_err(|e| TablekitError::Execution(e.to_string()))?;
        gateway.close()?;
        Ok(fixture)
    }

    /// Opens a new gateway on the fixture database
    pub fn gateway(&self) -> Result<CrudGateway> {
        CrudGateway::connect(&self.config)
    }
}
