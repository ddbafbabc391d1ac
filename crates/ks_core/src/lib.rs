pub mod config;
pub mod error;
pub mod pipeline;
pub mod series;
pub mod source;
pub mod types;

pub use config::DatabaseConfig;
pub use error::{Error, Result};
pub use pipeline::{compute_sentiment_series, SeriesRequest};
pub use series::{MonthlyCount, SeriesPoint, SeriesResult};
pub use source::{ArticleQuery, ArticleSource};
pub use types::{Article, City, Polarity, YearMonth, CUTOFF_DATE};

pub mod prelude {
    pub use crate::{
        compute_sentiment_series, Article, ArticleQuery, ArticleSource, City, Error, Polarity,
        Result, SeriesRequest, SeriesResult, YearMonth,
    };
}
