use ks_core::SeriesResult;
use std::fmt::Write;

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

/// Plain-text month table for the terminal.
pub fn format_table(series: &SeriesResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} / '{}': {} matching articles over {} months",
        series.city,
        series.keyword,
        series.matched_articles,
        series.points.len()
    );
    let _ = writeln!(
        out,
        "{:<8} {:>5} {:>5} {:>7} {:>7}",
        "month", "pos", "neg", "index", "avg6"
    );
    for point in &series.points {
        let _ = writeln!(
            out,
            "{:<8} {:>5} {:>5} {:>7} {:>7}",
            point.month.to_string(),
            point.positive,
            point.negative,
            cell(point.index),
            cell(point.moving_average)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ks_core::series::build_series;
    use ks_core::{Article, City, Polarity};

    #[test]
    fn test_format_table() {
        let matches = vec![Article {
            date: NaiveDate::from_ymd_opt(2020, 2, 3).unwrap(),
            polarity: Polarity::Negative,
            content: Some("미군".to_string()),
            city: City::Dongducheon,
        }];
        let span = (
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 2, 28).unwrap(),
        );
        let series = build_series(City::Dongducheon, "미군", span, &matches);
        let table = format_table(&series);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("동두천 / '미군': 1 matching articles over 2 months"));
        assert!(lines[2].starts_with("2020-01"));
        assert!(lines[2].contains("0.000"));
        assert!(lines[3].trim_end().ends_with('-'));
    }
}
