use clap::Args;
use ks_core::{DatabaseConfig, Error, Result};
use ks_storage::SourceConfig;
use std::path::PathBuf;

/// Where to read articles from. A SQLite mirror wins over a JSON config file,
/// which wins over the individual MySQL options.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// Read from a local SQLite mirror of the sentiment table
    #[arg(long, global = true)]
    pub sqlite: Option<PathBuf>,

    /// JSON file holding the MySQL connection settings
    #[arg(long, global = true, env = "KWSENT_DB_CONFIG")]
    pub db_config: Option<PathBuf>,

    #[arg(long, global = true, env = "KWSENT_DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, global = true, env = "KWSENT_DB_PORT")]
    pub db_port: Option<u16>,

    #[arg(long, global = true, env = "KWSENT_DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, global = true, env = "KWSENT_DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    #[arg(long, global = true, env = "KWSENT_DB_NAME")]
    pub db_name: Option<String>,

    #[arg(long, global = true, env = "KWSENT_DB_CHARSET", default_value = "utf8")]
    pub db_charset: String,

    /// Sentiment table, optionally schema-qualified
    #[arg(
        long,
        global = true,
        env = "KWSENT_DB_TABLE",
        default_value = "country_news_sentiment_tot"
    )]
    pub db_table: String,
}

fn required(value: Option<String>, flag: &str, env: &str) -> Result<String> {
    value.ok_or_else(|| Error::Config(format!("missing --{} (or {})", flag, env)))
}

impl SourceArgs {
    pub fn into_config(self) -> Result<SourceConfig> {
        if let Some(path) = self.sqlite {
            return Ok(SourceConfig::Sqlite(path));
        }
        if let Some(path) = self.db_config {
            return Ok(SourceConfig::MySql(DatabaseConfig::from_json_file(&path)?));
        }

        let config = DatabaseConfig {
            host: required(self.db_host, "db-host", "KWSENT_DB_HOST")?,
            port: self.db_port,
            user: required(self.db_user, "db-user", "KWSENT_DB_USER")?,
            password: required(self.db_password, "db-password", "KWSENT_DB_PASSWORD")?,
            database: required(self.db_name, "db-name", "KWSENT_DB_NAME")?,
            charset: self.db_charset,
            table: self.db_table,
        };
        config.validate()?;
        Ok(SourceConfig::MySql(config))
    }
}
