//! SVG rendering of a sentiment series.
//!
//! The upper panel plots the monthly index, its 6-month moving average and the
//! 0.5 reference line. The lower panel shows how many articles matched each
//! month. Both panels share the month axis and split the height 3:1.

use ks_core::{Error, Result, SeriesResult, YearMonth};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

const INDEX_COLOR: RGBColor = RGBColor(0, 128, 0);
const AVERAGE_COLOR: RGBColor = RGBColor(0, 0, 255);
const REFERENCE_COLOR: RGBColor = RGBColor(255, 0, 0);
const BAR_COLOR: RGBColor = RGBColor(169, 169, 169);
const FONT: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

pub fn render_svg(series: &SeriesResult, options: &ChartOptions) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (options.width, options.height))
            .into_drawing_area();
        draw(&root, series).map_err(|e| Error::Render(e.to_string()))?;
        root.present().map_err(|e| Error::Render(e.to_string()))?;
    }
    Ok(svg)
}

pub fn render_to_file(series: &SeriesResult, options: &ChartOptions, path: &Path) -> Result<()> {
    let svg = render_svg(series, options)?;
    std::fs::write(path, svg)?;
    info!("📈 Chart written to {}", path.display());
    Ok(())
}

/// Axis label for an x position; only whole positions name a month.
fn month_label(months: &[YearMonth], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    months
        .get(rounded as usize)
        .map(|month| month.to_string())
        .unwrap_or_default()
}

fn caption(series: &SeriesResult) -> String {
    if series.is_degenerate() {
        format!("감성지수: '{}' (일치 기사 없음)", series.keyword)
    } else {
        format!("감성지수: '{}'", series.keyword)
    }
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &SeriesResult,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let (_, height) = root.dim_in_pixel();
    let (upper, lower) = root.split_vertically(height * 3 / 4);

    let months: Vec<YearMonth> = series.points.iter().map(|point| point.month).collect();
    let x_end = months.len().max(1) as f64 - 0.5;
    let label = |x: &f64| month_label(&months, *x);

    let mut index_chart = ChartBuilder::on(&upper)
        .caption(caption(series), (FONT, 24))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..x_end, -0.05f64..1.05f64)?;

    index_chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&label)
        .y_desc("감성지수")
        .draw()?;

    let index_points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, point)| point.index.map(|value| (i as f64, value)))
        .collect();
    let average_points: Vec<(f64, f64)> = series
        .points
        .iter()
        .enumerate()
        .filter_map(|(i, point)| point.moving_average.map(|value| (i as f64, value)))
        .collect();

    index_chart
        .draw_series(LineSeries::new(index_points, INDEX_COLOR.stroke_width(1)).point_size(4))?
        .label("감성지수")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], INDEX_COLOR));

    index_chart
        .draw_series(LineSeries::new(average_points, AVERAGE_COLOR.stroke_width(3)))?
        .label("6개월 이동평균")
        .legend(|(x, y)| {
            PathElement::new(vec![(x, y), (x + 20, y)], AVERAGE_COLOR.stroke_width(3))
        });

    index_chart
        .draw_series(LineSeries::new(
            vec![(-0.5, 0.5), (x_end, 0.5)],
            REFERENCE_COLOR.stroke_width(1),
        ))?
        .label("0.5")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REFERENCE_COLOR));

    index_chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, 14))
        .draw()?;

    let max_count = series.max_count();
    let y_max = if max_count == 0 {
        1.0
    } else {
        max_count as f64 * 1.2
    };

    let mut count_chart = ChartBuilder::on(&lower)
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..x_end, 0f64..y_max)?;

    count_chart
        .configure_mesh()
        .x_labels(12)
        .x_label_formatter(&label)
        .x_desc("연월")
        .y_desc("기사수")
        .draw()?;

    let positions: HashMap<YearMonth, usize> = months
        .iter()
        .enumerate()
        .map(|(i, month)| (*month, i))
        .collect();
    count_chart.draw_series(series.monthly_counts.iter().filter_map(|entry| {
        let x = *positions.get(&entry.month)? as f64;
        Some(Rectangle::new(
            [(x - 0.35, 0.0), (x + 0.35, entry.count as f64)],
            BAR_COLOR.mix(0.8).filled(),
        ))
    }))?;

    Ok(())
}
