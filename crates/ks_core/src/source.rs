use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::{cutoff_date, Article, City};
use crate::Result;

/// Row selection pushed down to storage: one city, polarized rows only, on or after `since`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub city: City,
    pub since: NaiveDate,
}

impl ArticleQuery {
    pub fn new(city: City) -> Self {
        Self {
            city,
            since: cutoff_date(),
        }
    }

    pub fn since(mut self, since: NaiveDate) -> Self {
        self.since = since;
        self
    }
}

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &'static str;

    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Fetch every non-neutral article for the query's city dated on or after `since`
    async fn fetch_polarized(&self, query: &ArticleQuery) -> Result<Vec<Article>>;
}

pub fn filter_by_keyword(articles: &[Article], keyword: &str) -> Vec<Article> {
    articles
        .iter()
        .filter(|article| article.mentions(keyword))
        .cloned()
        .collect()
}

/// Earliest and latest article date, or `None` for an empty slice.
pub fn date_span(articles: &[Article]) -> Option<(NaiveDate, NaiveDate)> {
    let first = articles.first()?.date;
    Some(articles.iter().fold((first, first), |(min, max), article| {
        (min.min(article.date), max.max(article.date))
    }))
}
