use ks_core::{ArticleSource, DatabaseConfig, Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub mod backends;

pub use backends::*;

/// Where articles are read from.
#[derive(Debug, Clone)]
pub enum SourceConfig {
    MySql(DatabaseConfig),
    Sqlite(PathBuf),
}

impl SourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::MySql(_) => "mysql",
            SourceConfig::Sqlite(_) => "sqlite",
        }
    }
}

pub async fn create_source(config: &SourceConfig) -> Result<Arc<dyn ArticleSource>> {
    let source: Arc<dyn ArticleSource> = match config {
        #[cfg(feature = "mysql")]
        SourceConfig::MySql(db) => Arc::new(MySqlSource::connect(db).await?),
        #[cfg(feature = "sqlite")]
        SourceConfig::Sqlite(path) => Arc::new(SqliteSource::new_with_path(path).await?),
        #[allow(unreachable_patterns)]
        other => {
            return Err(Error::Config(format!(
                "{} support is not compiled in",
                other.kind()
            )))
        }
    };
    info!("💾 Using {} article source", source.name());
    Ok(source)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_source, SourceConfig};
}
