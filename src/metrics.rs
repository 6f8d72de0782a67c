use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::error::{Error, Result};

/// One day's data-quality score (0–100 %). Only built through [`DailyScore::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyScore {
    label: String,
    value: u8,
}

impl DailyScore {
    pub fn new(label: impl Into<String>, value: u8) -> Result<Self> {
        if value > 100 {
            return Err(Error::InvalidInput(format!("score {value} is above 100")));
        }
        Ok(Self {
            label: label.into(),
            value,
        })
    }

    /// Score labelled with the German weekday abbreviation of `date`.
    pub fn for_date(date: NaiveDate, value: u8) -> Result<Self> {
        Self::new(weekday_label(date.weekday()), value)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Di",
        Weekday::Wed => "Mi",
        Weekday::Thu => "Do",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "So",
    }
}

/// Mean of the series, rounded half-up to a whole percent.
pub fn average(series: &[DailyScore]) -> Result<u8> {
    if series.is_empty() {
        return Err(Error::InvalidInput("cannot average an empty score series".into()));
    }
    if let Some(bad) = series.iter().find(|s| s.value > 100) {
        return Err(Error::InvalidInput(format!(
            "score {} for {} is above 100",
            bad.value, bad.label
        )));
    }
    let n = series.len() as u64;
    let sum: u64 = series.iter().map(|s| u64::from(s.value)).sum();
    // floor((sum / n) + 0.5) without floats
    let mean = (2 * sum + n) / (2 * n);
    Ok(mean as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Change between the first and the last day of the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trend {
    pub delta: i16,
    pub direction: Direction,
}

impl Trend {
    /// Sub-line text, e.g. "+6% seit Mo".
    pub fn label(&self, since: &str) -> String {
        format!("{:+}% seit {since}", self.delta)
    }
}

pub fn trend(series: &[DailyScore]) -> Result<Trend> {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return Err(Error::InvalidInput("cannot compute a trend over an empty series".into()));
    };
    let delta = i16::from(last.value) - i16::from(first.value);
    let direction = match delta {
        d if d > 0 => Direction::Up,
        d if d < 0 => Direction::Down,
        _ => Direction::Flat,
    };
    Ok(Trend { delta, direction })
}

/// A headline tile in the KPI strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    pub title: &'static str,
    pub value: String,
    pub sub: String,
}

/// KPI strip: the quality tile is derived; the other tiles are fixed
/// catalog figures supplied with the demo data.
pub fn kpis(series: &[DailyScore], fixed: &[(&'static str, &'static str, &'static str)]) -> Result<Vec<Kpi>> {
    let avg = average(series)?;
    let t = trend(series)?;
    let since = series.first().map(|s| s.label.as_str()).unwrap_or_default();
    let mut out = Vec::with_capacity(fixed.len() + 1);
    out.push(Kpi {
        title: "Datenqualität",
        value: format!("{avg}%"),
        sub: t.label(since),
    });
    out.extend(fixed.iter().map(|&(title, value, sub)| Kpi {
        title,
        value: value.to_owned(),
        sub: sub.to_owned(),
    }));
    Ok(out)
}
