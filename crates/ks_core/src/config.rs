use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::{Error, Result};

/// Connection settings for the news sentiment database.
///
/// Every field except `port` must be supplied by the caller; nothing here falls
/// back to built-in values.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub host: String,
    #[serde(default)]
    pub port: Option<u16>,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
    /// Table holding the per-article sentiment rows, optionally schema-qualified.
    pub table: String,
}

impl DatabaseConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("host", &self.host),
            ("user", &self.user),
            ("database", &self.database),
            ("charset", &self.charset),
            ("table", &self.table),
        ] {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("database {} must not be empty", field)));
            }
        }
        if !is_table_identifier(&self.table) {
            return Err(Error::Config(format!("invalid table name: {}", self.table)));
        }
        Ok(())
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("charset", &self.charset)
            .field("table", &self.table)
            .finish()
    }
}

/// Table names are interpolated into SQL, so only dotted `[A-Za-z0-9_]` segments pass.
pub fn is_table_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
