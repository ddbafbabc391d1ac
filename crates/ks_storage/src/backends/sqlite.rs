use async_trait::async_trait;
use ks_core::{Article, ArticleQuery, ArticleSource, Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::record::{into_articles, SentimentRecord};
use super::select_polarized_sql;

pub const TABLE: &str = "country_news_sentiment_tot";

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS country_news_sentiment_tot (
        date TEXT,
        sentiment TEXT NOT NULL,
        content TEXT,
        cname TEXT NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS idx_sentiment_city_date
        ON country_news_sentiment_tot (cname, date)
    "#,
];

/// Local SQLite mirror of the sentiment table, for offline analysis.
pub struct SqliteSource {
    pool: Arc<SqlitePool>,
    db_path: Option<PathBuf>,
}

impl SqliteSource {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::Database(format!("Failed to open {}: {}", db_path.display(), e)))?;

        Self::migrate(pool, Some(db_path.to_path_buf())).await
    }

    /// A private in-memory database. One connection keeps every query on the same database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| Error::Database(format!("Failed to open in-memory database: {}", e)))?;

        Self::migrate(pool, None).await
    }

    async fn migrate(pool: SqlitePool, db_path: Option<PathBuf>) -> Result<Self> {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| Error::Database(format!("Failed to run migration {}: {}", i, e)))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path,
        })
    }

    pub fn get_db_path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub async fn insert_record(&self, record: &SentimentRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO country_news_sentiment_tot (date, sentiment, content, cname)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&record.date)
        .bind(&record.sentiment)
        .bind(record.content.as_deref())
        .bind(&record.city)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to insert record: {}", e)))?;

        Ok(())
    }
}

fn record_from_row(row: &SqliteRow) -> Result<SentimentRecord> {
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
impl ArticleSource for SqliteSource {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("SQLite ping failed: {}", e)))?;
        Ok(())
    }

    async fn fetch_polarized(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let rows = sqlx::query(&select_polarized_sql(TABLE))
            .bind(query.city.name())
            .bind(query.since)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to fetch articles: {}", e)))?;

        let records = rows
            .iter()
            .map(record_from_row)
            .collect::<Result<Vec<_>>>()?;
        into_articles(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ks_core::{City, Polarity};
    use tempfile::tempdir;

    async fn seeded(source: &SqliteSource) {
        for record in [
            SentimentRecord::new("2019-12-31", "1", Some("미군 부대"), "동두천"),
            SentimentRecord::new("2020-01-15", "1", Some("미군 부대"), "동두천"),
            SentimentRecord::new("2020-02-15 08:30:00", "-1", None, "동두천"),
            SentimentRecord::new("2020-03-15", "0", Some("미군"), "동두천"),
            SentimentRecord::new("2020-03-15", "-1", Some("미군"), "양주"),
        ] {
            source.insert_record(&record).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_sqlite_query_filters() {
        let source = SqliteSource::in_memory().await.unwrap();
        seeded(&source).await;
        source.ping().await.unwrap();

        let articles = source
            .fetch_polarized(&ArticleQuery::new(City::Dongducheon))
            .await
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert!(articles.iter().all(|a| a.city == City::Dongducheon));
        assert!(articles
            .iter()
            .any(|a| a.polarity == Polarity::Negative && a.content.is_none()));
        assert!(articles
            .iter()
            .all(|a| a.date >= NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()));
    }

    #[tokio::test]
    async fn test_sqlite_file_database() {
        let temp_dir = tempdir().unwrap();
        let db_path = temp_dir.path().join("mirror").join("sentiment.db");

        let source = SqliteSource::new_with_path(&db_path).await.unwrap();
        seeded(&source).await;
        assert_eq!(source.get_db_path(), Some(db_path.as_path()));

        let since = NaiveDate::from_ymd_opt(2020, 2, 1).unwrap();
        let articles = source
            .fetch_polarized(&ArticleQuery::new(City::Dongducheon).since(since))
            .await
            .unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].date, NaiveDate::from_ymd_opt(2020, 2, 15).unwrap());
    }
}
