//! TOML configuration for a SQL session.
//!
//! ```toml
//! [limits]
//! max_connections = 100
//! max_cursors = 99
//! command_size = 32752
//!
//! [driver]
//! kind = "memory"
//! extended_fetch = true
//!
//! [[driver.tables]]
//! name = "books"
//! columns = [
//!     { name = "id", type = "integer" },
//!     { name = "title", type = "varchar", precision = 40 },
//! ]
//! rows = [["1", "Dune"], ["2", "NULL"]]
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::driver::SqlType;

/// Failure to load a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config (read): '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config (parse): {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config (limits): {0} must be at least 1")]
    Limit(&'static str),
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SqlConfig {
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub driver: DriverConfig,
}

impl SqlConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SqlConfig = toml::from_str(content)?;
        config.limits.validate()?;
        Ok(config)
    }
}

/// Table sizes and the command buffer bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Limits {
    /// Named connections; the default connection lives outside this count.
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_max_cursors")]
    pub max_cursors: usize,
    /// Longest command text after parameter substitution.
    #[serde(default = "default_command_size")]
    pub command_size: usize,
}

fn default_max_connections() -> usize {
    100
}
fn default_max_cursors() -> usize {
    99
}
fn default_command_size() -> usize {
    32752
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_connections: default_max_connections(),
            max_cursors: default_max_cursors(),
            command_size: default_command_size(),
        }
    }
}

impl Limits {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::Limit("max_connections"));
        }
        if self.max_cursors == 0 {
            return Err(ConfigError::Limit("max_cursors"));
        }
        if self.command_size == 0 {
            return Err(ConfigError::Limit("command_size"));
        }
        Ok(())
    }
}

/// Which driver a session loads.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DriverConfig {
    Memory(MemoryConfig),
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig::Memory(MemoryConfig::default())
    }
}

/// Settings of the in-memory driver.
#[derive(Clone, Debug, Deserialize)]
pub struct MemoryConfig {
    #[serde(default)]
    pub extended_fetch: bool,
    #[serde(default)]
    pub tables: Vec<TableConfig>,
    /// Data source names whose connections are refused.
    #[serde(default)]
    pub reject_servers: Vec<String>,
    /// Cell text that stands for SQL NULL.
    #[serde(default = "default_null_token")]
    pub null_token: String,
}

fn default_null_token() -> String {
    "NULL".into()
}

impl Default for MemoryConfig {
    fn default() -> Self {
        MemoryConfig {
            extended_fetch: false,
            tables: Vec::new(),
            reject_servers: Vec::new(),
            null_token: default_null_token(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct TableConfig {
    pub name: String,
    pub columns: Vec<ColumnConfig>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub sql_type: SqlType,
    #[serde(default)]
    pub precision: usize,
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [limits]
        max_connections = 4

        [driver]
        kind = "memory"
        extended_fetch = true
        reject_servers = ["offline"]

        [[driver.tables]]
        name = "books"
        columns = [
            { name = "id", type = "integer" },
            { name = "title", type = "varchar", precision = 40 },
        ]
        rows = [["1", "Dune"], ["2", "NULL"]]
    "#;

    #[test]
    fn parses_limits_and_driver() {
        let config = SqlConfig::from_toml(SAMPLE).unwrap();
        assert_eq!(config.limits.max_connections, 4);
        assert_eq!(config.limits.max_cursors, 99);
        assert_eq!(config.limits.command_size, 32752);
        let DriverConfig::Memory(memory) = config.driver;
        assert!(memory.extended_fetch);
        assert_eq!(memory.reject_servers, vec!["offline".to_string()]);
        assert_eq!(memory.null_token, "NULL");
        assert_eq!(memory.tables[0].columns[1].sql_type, SqlType::VarChar);
        assert_eq!(memory.tables[0].columns[1].precision, 40);
        assert_eq!(memory.tables[0].rows.len(), 2);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = SqlConfig::from_toml("").unwrap();
        assert_eq!(config.limits, Limits::default());
        let DriverConfig::Memory(memory) = config.driver;
        assert!(memory.tables.is_empty());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = SqlConfig::from_toml("[limits]\nmax_cursors = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Limit("max_cursors")));
    }

    #[test]
    fn unknown_driver_kind_is_a_parse_error() {
        let err = SqlConfig::from_toml("[driver]\nkind = \"odbc\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let config = SqlConfig::load(file.path()).unwrap();
        assert_eq!(config.limits.max_connections, 4);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = SqlConfig::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
