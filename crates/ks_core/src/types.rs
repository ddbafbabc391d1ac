use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Earliest article date considered by a query, as (year, month, day).
pub const CUTOFF_DATE: (i32, u32, u32) = (2020, 1, 1);

pub fn cutoff_date() -> NaiveDate {
    let (year, month, day) = CUTOFF_DATE;
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

/// Cities covered by the news sentiment table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum City {
    Gapyeong,
    Guri,
    Goyang,
    Namyangju,
    Dongducheon,
    Yangju,
    Yeoncheon,
    Uijeongbu,
    Paju,
    Pocheon,
}

impl City {
    pub const ALL: [City; 10] = [
        City::Gapyeong,
        City::Guri,
        City::Goyang,
        City::Namyangju,
        City::Dongducheon,
        City::Yangju,
        City::Yeoncheon,
        City::Uijeongbu,
        City::Paju,
        City::Pocheon,
    ];

    /// Name as stored in the `cname` column.
    pub fn name(&self) -> &'static str {
        match self {
            City::Gapyeong => "가평",
            City::Guri => "구리",
            City::Goyang => "고양",
            City::Namyangju => "남양주",
            City::Dongducheon => "동두천",
            City::Yangju => "양주",
            City::Yeoncheon => "연천",
            City::Uijeongbu => "의정부",
            City::Paju => "파주",
            City::Pocheon => "포천",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            City::Gapyeong => "gapyeong",
            City::Guri => "guri",
            City::Goyang => "goyang",
            City::Namyangju => "namyangju",
            City::Dongducheon => "dongducheon",
            City::Yangju => "yangju",
            City::Yeoncheon => "yeoncheon",
            City::Uijeongbu => "uijeongbu",
            City::Paju => "paju",
            City::Pocheon => "pocheon",
        }
    }
}

impl Default for City {
    fn default() -> Self {
        Self::Dongducheon
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for City {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        City::ALL
            .iter()
            .copied()
            .find(|city| city.name() == needle || city.slug().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::UnknownCity(needle.to_string()))
    }
}

impl Serialize for City {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for City {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Negative,
    Positive,
}

impl Polarity {
    /// Parses a stored sentiment label. Neutral ("0") has no polarity.
    pub fn from_label(label: &str) -> Result<Option<Self>> {
        match label.trim() {
            "1" => Ok(Some(Polarity::Positive)),
            "-1" => Ok(Some(Polarity::Negative)),
            "0" => Ok(None),
            other => Err(Error::MalformedRow(format!("unexpected sentiment label {:?}", other))),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Polarity::Negative => "-1",
            Polarity::Positive => "1",
        }
    }
}

/// A calendar month, ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::MalformedRow(format!("month out of range: {}", month)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every month from `start` to `end`, both inclusive. Empty when `start > end`.
    pub fn range_inclusive(start: Self, end: Self) -> impl Iterator<Item = YearMonth> {
        std::iter::successors(Some(start), |m| Some(m.succ())).take_while(move |m| *m <= end)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| Error::MalformedRow(format!("invalid year-month {:?}", s)))?;
        let year = year
            .parse::<i32>()
            .map_err(|e| Error::MalformedRow(format!("invalid year in {:?}: {}", s, e)))?;
        let month = month
            .parse::<u32>()
            .map_err(|e| Error::MalformedRow(format!("invalid month in {:?}: {}", s, e)))?;
        Self::new(year, month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub date: NaiveDate,
    pub polarity: Polarity,
    pub content: Option<String>,
    pub city: City,
}

impl Article {
    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.date)
    }

    /// Literal, case-sensitive substring test. Articles without content never match.
    pub fn mentions(&self, keyword: &str) -> bool {
        self.content
            .as_deref()
            .map_or(false, |content| content.contains(keyword))
    }
}

/// Parses a stored date value, returning `None` when it cannot be read.
pub fn parse_article_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}
