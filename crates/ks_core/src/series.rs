//! Monthly aggregation of keyword matches into a sentiment index.
//!
//! The month grid always spans the city's full recorded range, so months
//! without a single match still get a point. Their index is carried over from
//! neighbouring months by [`fill_gaps`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::{Article, City, Polarity, YearMonth};

pub const MOVING_AVERAGE_WINDOW: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolarityCounts {
    pub positive: usize,
    pub negative: usize,
}

impl PolarityCounts {
    fn record(&mut self, polarity: Polarity) {
        match polarity {
            Polarity::Positive => self.positive += 1,
            Polarity::Negative => self.negative += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub month: YearMonth,
    pub positive: usize,
    pub negative: usize,
    /// Index before gap filling; `None` for months without matches.
    pub raw_index: Option<f64>,
    pub index: Option<f64>,
    pub moving_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    pub month: YearMonth,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResult {
    pub city: City,
    pub keyword: String,
    /// One point per month of the city's recorded range, in order.
    pub points: Vec<SeriesPoint>,
    /// Months with at least one match, in order.
    pub monthly_counts: Vec<MonthlyCount>,
    pub matched_articles: usize,
}

impl SeriesResult {
    /// True when no month had a match, leaving the index undefined everywhere.
    pub fn is_degenerate(&self) -> bool {
        self.points.iter().all(|point| point.index.is_none())
    }

    pub fn max_count(&self) -> usize {
        self.monthly_counts
            .iter()
            .map(|entry| entry.count)
            .max()
            .unwrap_or(0)
    }
}

/// 1 for positive-only months, 0 for negative-only, the positive share otherwise.
pub fn polarity_index(counts: PolarityCounts) -> Option<f64> {
    match (counts.positive, counts.negative) {
        (0, 0) => None,
        (_, 0) => Some(1.0),
        (0, _) => Some(0.0),
        (positive, negative) => Some(positive as f64 / (positive + negative) as f64),
    }
}

/// Forward fill, then backfill whatever leading gap remains.
pub fn fill_gaps(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut last = None;
    let mut filled: Vec<Option<f64>> = values
        .iter()
        .map(|value| {
            if value.is_some() {
                last = *value;
            }
            last
        })
        .collect();

    let first_defined = filled.iter().flatten().next().copied();
    for value in filled.iter_mut().take_while(|value| value.is_none()) {
        *value = first_defined;
    }
    filled
}

/// Mean of each value and the `window - 1` before it. Undefined until a full
/// window is available, or when any value inside the window is undefined.
pub fn trailing_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            values[i + 1 - window..=i]
                .iter()
                .copied()
                .sum::<Option<f64>>()
                .map(|sum| sum / window as f64)
        })
        .collect()
}

/// Polarity counts for every month from `first` to `last`, zero where nothing matched.
pub fn count_grid(
    first: YearMonth,
    last: YearMonth,
    articles: &[Article],
) -> BTreeMap<YearMonth, PolarityCounts> {
    let mut grid: BTreeMap<YearMonth, PolarityCounts> = YearMonth::range_inclusive(first, last)
        .map(|month| (month, PolarityCounts::default()))
        .collect();
    for article in articles {
        match grid.get_mut(&article.month()) {
            Some(cell) => cell.record(article.polarity),
            None => tracing::debug!(
                "article dated {} falls outside {}..{}",
                article.date,
                first,
                last
            ),
        }
    }
    grid
}

pub fn monthly_counts(articles: &[Article]) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<YearMonth, usize> = BTreeMap::new();
    for article in articles {
        *counts.entry(article.month()).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

/// Builds the monthly series for `matches` over the month range of `span`.
///
/// `span` is the date range of the city's unfiltered rows, while the polarity
/// counts come from `matches` only.
pub fn build_series(
    city: City,
    keyword: &str,
    span: (NaiveDate, NaiveDate),
    matches: &[Article],
) -> SeriesResult {
    let (first, last) = (YearMonth::from_date(span.0), YearMonth::from_date(span.1));
    let grid = count_grid(first, last, matches);

    let raw: Vec<Option<f64>> = grid.values().copied().map(polarity_index).collect();
    let filled = fill_gaps(&raw);
    let averaged = trailing_mean(&filled, MOVING_AVERAGE_WINDOW);

    let points = grid
        .into_iter()
        .zip(raw)
        .zip(filled)
        .zip(averaged)
        .map(|((((month, counts), raw_index), index), moving_average)| SeriesPoint {
            month,
            positive: counts.positive,
            negative: counts.negative,
            raw_index,
            index,
            moving_average,
        })
        .collect();

    SeriesResult {
        city,
        keyword: keyword.to_string(),
        points,
        monthly_counts: monthly_counts(matches),
        matched_articles: matches.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(date: &str, polarity: Polarity) -> Article {
        Article {
            date: date.parse().unwrap(),
            polarity,
            content: Some("미군".to_string()),
            city: City::Dongducheon,
        }
    }

    fn span(first: &str, last: &str) -> (NaiveDate, NaiveDate) {
        (first.parse().unwrap(), last.parse().unwrap())
    }

    fn counts(positive: usize, negative: usize) -> PolarityCounts {
        PolarityCounts { positive, negative }
    }

    #[test]
    fn test_polarity_index_rules() {
        assert_eq!(polarity_index(counts(3, 0)), Some(1.0));
        assert_eq!(polarity_index(counts(0, 2)), Some(0.0));
        assert_eq!(polarity_index(counts(1, 3)), Some(0.25));
        assert_eq!(polarity_index(counts(2, 1)), Some(2.0 / 3.0));
        assert_eq!(polarity_index(counts(0, 0)), None);
    }

    #[test]
    fn test_fill_gaps_forward_then_backward() {
        let values = [None, None, Some(0.2), None, Some(0.8), None];
        assert_eq!(
            fill_gaps(&values),
            vec![Some(0.2), Some(0.2), Some(0.2), Some(0.2), Some(0.8), Some(0.8)]
        );
        assert_eq!(fill_gaps(&[None, None]), vec![None, None]);
        assert!(fill_gaps(&[]).is_empty());
    }

    #[test]
    fn test_trailing_mean_window() {
        let values: Vec<Option<f64>> = (0..8).map(|i| Some(i as f64)).collect();
        let averaged = trailing_mean(&values, 6);
        assert!(averaged[..5].iter().all(Option::is_none));
        assert_eq!(averaged[5], Some(2.5));
        assert_eq!(averaged[6], Some(3.5));
        assert_eq!(averaged[7], Some(4.5));

        let gappy = [Some(1.0), None, Some(1.0)];
        assert_eq!(trailing_mean(&gappy, 2), vec![None, None, None]);
        assert_eq!(trailing_mean(&gappy, 0), vec![None, None, None]);
    }

    #[test]
    fn test_dongducheon_scenario() {
        let matches = vec![
            article("2020-01-05", Polarity::Positive),
            article("2020-01-20", Polarity::Positive),
            article("2020-02-11", Polarity::Positive),
            article("2020-02-12", Polarity::Negative),
        ];
        let series = build_series(
            City::Dongducheon,
            "미군",
            span("2020-01-02", "2020-03-30"),
            &matches,
        );

        let indices: Vec<Option<f64>> = series.points.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![Some(1.0), Some(0.5), Some(0.5)]);
        assert_eq!(series.points[2].raw_index, None);
        assert_eq!((series.points[1].positive, series.points[1].negative), (1, 1));
        assert!(series.points.iter().all(|p| p.moving_average.is_none()));

        assert_eq!(series.monthly_counts.len(), 2);
        assert_eq!(series.monthly_counts[0].count, 2);
        assert_eq!(series.matched_articles, 4);
    }

    #[test]
    fn test_leading_gap_takes_first_defined_month() {
        let matches = vec![article("2020-04-15", Polarity::Negative)];
        let series = build_series(City::Yangju, "미군", span("2020-01-01", "2020-05-31"), &matches);
        let indices: Vec<Option<f64>> = series.points.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![Some(0.0); 5]);
    }

    #[test]
    fn test_grid_spans_full_range_and_counts_sum() {
        let matches = vec![
            article("2020-03-01", Polarity::Positive),
            article("2020-03-31", Polarity::Negative),
            article("2020-03-15", Polarity::Negative),
            article("2021-02-01", Polarity::Positive),
        ];
        let series = build_series(
            City::Dongducheon,
            "미군",
            span("2020-01-09", "2021-03-02"),
            &matches,
        );

        assert_eq!(series.points.len(), 15);
        assert_eq!(series.points[0].month.to_string(), "2020-01");
        assert_eq!(series.points[14].month.to_string(), "2021-03");
        assert!(series.points.iter().all(|p| p.index.is_some()));

        let total: usize = series.monthly_counts.iter().map(|c| c.count).sum();
        assert_eq!(total, matches.len());
        assert_eq!(series.max_count(), 3);

        for i in 5..series.points.len() {
            let mean = series.points[i - 5..=i]
                .iter()
                .map(|p| p.index.unwrap())
                .sum::<f64>()
                / 6.0;
            let average = series.points[i].moving_average.unwrap();
            assert!((average - mean).abs() < 1e-12);
        }
    }

    #[test]
    fn test_no_matches_leaves_index_undefined() {
        let series = build_series(City::Guri, "없는단어", span("2020-01-01", "2020-08-01"), &[]);
        assert_eq!(series.points.len(), 8);
        assert!(series
            .points
            .iter()
            .all(|p| p.positive == 0 && p.negative == 0 && p.index.is_none()));
        assert!(series.points.iter().all(|p| p.moving_average.is_none()));
        assert!(series.monthly_counts.is_empty());
        assert!(series.is_degenerate());
        assert_eq!(series.max_count(), 0);
    }
}
