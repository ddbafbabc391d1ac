use chrono::NaiveDate;
use tracing::{debug, info};

use crate::series::{build_series, SeriesResult};
use crate::source::{date_span, filter_by_keyword, ArticleQuery, ArticleSource};
use crate::types::{cutoff_date, City};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub city: City,
    pub keyword: String,
    pub since: NaiveDate,
}

impl SeriesRequest {
    pub fn new(city: City, keyword: impl Into<String>) -> Self {
        Self {
            city,
            keyword: keyword.into(),
            since: cutoff_date(),
        }
    }

    pub fn since(mut self, since: NaiveDate) -> Self {
        self.since = since;
        self
    }
}

/// Fetches the city's articles, keeps those mentioning the keyword and builds
/// the monthly sentiment series over the city's full date range.
pub async fn compute_sentiment_series(
    source: &dyn ArticleSource,
    request: &SeriesRequest,
) -> Result<SeriesResult> {
    let query = ArticleQuery::new(request.city).since(request.since);
    let articles = source.fetch_polarized(&query).await?;
    info!(
        "📰 Fetched {} polarized articles for {} from {}",
        articles.len(),
        request.city,
        source.name()
    );

    let span = date_span(&articles).ok_or_else(|| Error::EmptyDateRange {
        city: request.city.to_string(),
        since: request.since.to_string(),
    })?;

    let matches = filter_by_keyword(&articles, &request.keyword);
    info!("🔎 {} articles mention '{}'", matches.len(), request.keyword);

    let series = build_series(request.city, &request.keyword, span, &matches);
    debug!(
        "Built {} monthly points ({} with matches) between {} and {}",
        series.points.len(),
        series.monthly_counts.len(),
        span.0,
        span.1
    );
    Ok(series)
}
