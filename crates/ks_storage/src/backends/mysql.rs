use async_trait::async_trait;
use ks_core::{Article, ArticleQuery, ArticleSource, DatabaseConfig, Error, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::Row;
use tracing::info;

use super::record::{into_articles, SentimentRecord};
use super::select_polarized_sql;

/// The production sentiment table on MySQL.
pub struct MySqlSource {
    pool: MySqlPool,
    table: String,
}

impl MySqlSource {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        config.validate()?;

        let mut options = MySqlConnectOptions::new()
            .host(&config.host)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)
            .charset(&config.charset);
        if let Some(port) = config.port {
            options = options.port(port);
        }

        info!("🔌 Connecting to {}/{} as {}", config.host, config.database, config.user);
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect to {}: {}", config.host, e)))?;

        Ok(Self {
            pool,
            table: config.table.clone(),
        })
    }
}

fn record_from_row(row: &MySqlRow) -> Result<SentimentRecord> {
    let column = |e: sqlx::Error| Error::MalformedRow(format!("Failed to decode row: {}", e));
    Ok(SentimentRecord {
        date: row
            .try_get::<Option<String>, _>("date")
            .map_err(column)?
            .unwrap_or_default(),
        sentiment: row.try_get("sentiment").map_err(column)?,
        content: row.try_get("content").map_err(column)?,
        city: row.try_get("cname").map_err(column)?,
    })
}

#[async_trait]
impl ArticleSource for MySqlSource {
    fn name(&self) -> &'static str {
        "mysql"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("MySQL ping failed: {}", e)))?;
        Ok(())
    }

    async fn fetch_polarized(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let rows = sqlx::query(&select_polarized_sql(&self.table))
            .bind(query.city.name())
            .bind(query.since)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to fetch articles: {}", e)))?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>>>()?;
        into_articles(records)
    }
}
