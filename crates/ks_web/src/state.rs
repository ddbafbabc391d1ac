use chrono::NaiveDate;
use ks_chart::ChartOptions;
use ks_core::types::cutoff_date;
use ks_core::ArticleSource;
use std::sync::Arc;

pub struct AppState {
    pub source: Arc<dyn ArticleSource>,
    pub since: NaiveDate,
    pub chart: ChartOptions,
}

impl AppState {
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self {
            source,
            since: cutoff_date(),
            chart: ChartOptions::default(),
        }
    }

    pub fn with_since(mut self, since: NaiveDate) -> Self {
        self.since = since;
        self
    }
}
