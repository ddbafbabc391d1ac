use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use ks_chart::render_svg;
use ks_core::{compute_sentiment_series, City, Result, SeriesRequest, SeriesResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::AppState;

pub const DEFAULT_KEYWORD: &str = "미군";

#[derive(Debug, Default, Deserialize)]
pub struct SeriesParams {
    pub city: Option<String>,
    pub keyword: Option<String>,
}

impl SeriesParams {
    fn city(&self) -> Result<City> {
        match self.city.as_deref() {
            Some(name) if !name.trim().is_empty() => name.parse(),
            _ => Ok(City::default()),
        }
    }

    fn keyword(&self) -> &str {
        self.keyword.as_deref().unwrap_or(DEFAULT_KEYWORD)
    }
}

#[derive(Debug, Serialize)]
pub struct CityEntry {
    pub name: &'static str,
    pub slug: &'static str,
}

async fn run(state: &AppState, params: &SeriesParams) -> Result<SeriesResult> {
    let city = params.city()?;
    info!("📊 Computing series for {} / '{}'", city, params.keyword());
    let request = SeriesRequest::new(city, params.keyword()).since(state.since);
    compute_sentiment_series(state.source.as_ref(), &request).await
}

pub async fn list_cities() -> impl IntoResponse {
    let cities: Vec<CityEntry> = City::ALL
        .iter()
        .map(|city| CityEntry {
            name: city.name(),
            slug: city.slug(),
        })
        .collect();
    Json(cities)
}

pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> std::result::Result<Json<SeriesResult>, ApiError> {
    Ok(Json(run(&state, &params).await?))
}

pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> std::result::Result<impl IntoResponse, ApiError> {
    let series = run(&state, &params).await?;
    let svg = render_svg(&series, &state.chart)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

/// Keyword/city form with the chart for the submitted values rendered inline.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SeriesParams>,
) -> Html<String> {
    let selected = params.city().unwrap_or_default();
    let body = match run(&state, &params).await {
        Ok(series) => match render_svg(&series, &state.chart) {
            Ok(svg) => svg,
            Err(e) => format!("<p class=\"error\">{}</p>", escape_html(&e.to_string())),
        },
        Err(e) => format!("<p class=\"error\">{}</p>", escape_html(&e.to_string())),
    };

    let options: String = City::ALL
        .iter()
        .map(|city| {
            let marker = if *city == selected { " selected" } else { "" };
            format!("<option value=\"{0}\"{1}>{0}</option>", city.name(), marker)
        })
        .collect();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="ko">
<head><meta charset="utf-8"><title>키워드 기반 감성 지수 분석</title></head>
<body>
<h1>키워드 기반 감성 지수 분석</h1>
<p>기사 데이터를 사용하여 감성 지수 및 이동 평균을 시각화합니다.</p>
<form method="get" action="/">
<label>분석할 키워드를 입력하세요: <input name="keyword" value="{keyword}"></label>
<label>분석할 도시를 선택하세요: <select name="city">{options}</select></label>
<button type="submit">분석</button>
</form>
{body}
</body>
</html>"#,
        keyword = escape_html(params.keyword()),
        options = options,
        body = body,
    ))
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
