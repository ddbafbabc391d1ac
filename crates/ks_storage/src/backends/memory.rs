use async_trait::async_trait;
use ks_core::types::parse_article_date;
use ks_core::{Article, ArticleQuery, ArticleSource, Result};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::record::{into_articles, SentimentRecord};

/// Keeps raw sentiment rows in memory and applies the same filters as the SQL backends.
#[derive(Clone, Default)]
pub struct InMemorySource {
    records: Arc<RwLock<Vec<SentimentRecord>>>,
}

impl InMemorySource {
    pub fn new(records: Vec<SentimentRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn insert(&self, record: SentimentRecord) {
        self.records.write().await.push(record);
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn matches_query(record: &SentimentRecord, query: &ArticleQuery) -> bool {
    if record.sentiment.trim() == "0" || record.city != query.city.name() {
        return false;
    }
    // Unreadable dates are left for the record conversion to report.
    parse_article_date(&record.date).map_or(true, |date| date >= query.since)
}

#[async_trait]
impl ArticleSource for InMemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn fetch_polarized(&self, query: &ArticleQuery) -> Result<Vec<Article>> {
        let records = self.records.read().await;
        let selected = records
            .iter()
            .filter(|record| matches_query(record, query))
            .cloned()
            .collect();
        into_articles(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ks_core::{City, Polarity};

    #[tokio::test]
    async fn test_memory_source_filters() {
        let source = InMemorySource::new(vec![
            SentimentRecord::new("2019-12-31", "1", Some("미군"), "동두천"),
            SentimentRecord::new("2020-01-01", "1", Some("미군"), "동두천"),
            SentimentRecord::new("2020-02-01", "0", Some("미군"), "동두천"),
            SentimentRecord::new("2020-03-01", "-1", Some("미군"), "파주"),
        ]);
        source
            .insert(SentimentRecord::new("2020-04-01", "-1", None, "동두천"))
            .await;
        assert_eq!(source.len().await, 5);

        let articles = source
            .fetch_polarized(&ArticleQuery::new(City::Dongducheon))
            .await
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(articles[1].polarity, Polarity::Negative);
        assert!(articles.iter().all(|a| a.city == City::Dongducheon));
    }

    #[tokio::test]
    async fn test_memory_source_ping() {
        let source = InMemorySource::default();
        assert!(source.is_empty().await);
        assert!(source.ping().await.is_ok());
    }
}
