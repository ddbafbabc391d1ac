use ks_core::types::parse_article_date;
use ks_core::{Article, City, Error, Polarity, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A sentiment row as it comes out of storage, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: String,
    pub sentiment: String,
    pub content: Option<String>,
    #[serde(rename = "cname")]
    pub city: String,
}

impl SentimentRecord {
    pub fn new(date: &str, sentiment: &str, content: Option<&str>, city: &str) -> Self {
        Self {
            date: date.to_string(),
            sentiment: sentiment.to_string(),
            content: content.map(str::to_string),
            city: city.to_string(),
        }
    }

    /// Neutral rows and rows with unreadable dates yield `None`; an unknown
    /// sentiment label or city is a malformed row.
    pub fn into_article(self) -> Result<Option<Article>> {
        let Some(polarity) = Polarity::from_label(&self.sentiment)? else {
            return Ok(None);
        };
        let city: City = self
            .city
            .parse()
            .map_err(|_| Error::MalformedRow(format!("unknown city {:?}", self.city)))?;
        let Some(date) = parse_article_date(&self.date) else {
            warn!("⚠️ Skipping row with unreadable date {:?}", self.date);
            return Ok(None);
        };
        Ok(Some(Article {
            date,
            polarity,
            content: self.content,
            city,
        }))
    }
}

/// Converts fetched records, dropping the ones that carry no usable article.
pub fn into_articles(records: Vec<SentimentRecord>) -> Result<Vec<Article>> {
    let mut articles = Vec::with_capacity(records.len());
    for record in records {
        if let Some(article) = record.into_article()? {
            articles.push(article);
        }
    }
    Ok(articles)
}
