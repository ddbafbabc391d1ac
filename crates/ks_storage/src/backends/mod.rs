pub mod memory;
pub mod record;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemorySource;
pub use record::SentimentRecord;

#[cfg(feature = "mysql")]
pub use mysql::MySqlSource;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSource;

/// Text casts keep DATE, DATETIME and VARCHAR columns readable the same way on every backend.
pub(crate) fn select_polarized_sql(table: &str) -> String {
    format!(
        r#"
        SELECT CAST(date AS CHAR) AS date, CAST(sentiment AS CHAR) AS sentiment, content, cname
        FROM {}
        WHERE sentiment != '0'
          AND cname = ?
          AND date >= ?
        "#,
        table
    )
}
