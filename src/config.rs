use crate::core::db::ConnectionConfig;
use crate::core::{Result, TablekitError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: ConnectionConfig,
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        toml::from_str(content).map_err(|e| TablekitError::Config(e.to_string()))
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = tablekit::config::load_config("tablekit.toml").expect("Failed to load config");
/// println!("{:?}", config.database);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    debug!("loading configuration from {:?}", path);
    let content = fs::read_to_string(path)?;
    Config::from_toml_str(&content)
}

/// Per-user configuration file location, `<config dir>/tablekit/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tablekit").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE_CONFIG: &str = r#"
[database]
host = "/var/lib/app"
database = "app.db"
username = "app"
password = "secret"
create_if_missing = true
"#;

    #[test]
    fn test_load_config_from_str() {
        let config = Config::from_toml_str(SAMPLE_CONFIG).expect("Failed to parse sample config");
        assert_eq!(config.database.host, "/var/lib/app");
        assert_eq!(config.database.database, "app.db");
        assert_eq!(config.database.username, "app");
        assert_eq!(config.database.password, "secret");
        assert!(config.database.create_if_missing);
    }

    #[test]
    fn test_optional_fields_default() {
        let config = Config::from_toml_str("[database]\ndatabase = \":memory:\"\n").unwrap();
        assert!(config.database.is_in_memory());
        assert!(config.database.host.is_empty());
        assert!(!config.database.create_if_missing);
    }

    #[test]
    fn test_missing_database_section() {
        match Config::from_toml_str("[ui]\ntheme = \"dark\"\n") {
            Err(TablekitError::Config(_)) => {}
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CONFIG.as_bytes()).unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.database.database, "app.db");

        assert!(matches!(load_config("/nonexistent/tablekit.toml"), Err(TablekitError::Io(_))));
    }

    #[test]
    fn test_default_config_path() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("tablekit/config.toml"));
        }
    }
}
