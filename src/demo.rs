//! Inline demo data for the dashboard. Nothing here is fetched.

use chrono::{Days, NaiveDate};

use crate::error::{Error, Result};
use crate::metrics::DailyScore;
use crate::worklist::{TaskRecord, TaskStatus, Worklist};

/// Daily quality scores, one per day starting on [`WEEK_START`].
const QUALITY_TREND: [u8; 7] = [86, 87, 88, 90, 92, 91, 92];

/// A Monday, not tied to the current date.
const WEEK_START: (i32, u32, u32) = (2024, 6, 3);

/// Catalog coverage per region, in percent.
pub const COVERAGE: &[(&str, u8)] = &[("EU", 62), ("NA", 48), ("APAC", 37), ("LATAM", 28)];

/// Export share per channel, in percent.
pub const CHANNEL_SHARE: &[(&str, u8)] = &[
    ("TecDoc", 42),
    ("Amazon", 24),
    ("eBay", 14),
    ("Händler X", 12),
    ("OEM", 8),
];

/// (title, detail, when)
pub const ACTIVITY: &[(&str, &str, &str)] = &[
    ("Freigabe abgeschlossen", "Produkt P-100880", "vor 12 Min"),
    ("TAF-Import", "4.320 Artikel aktualisiert", "vor 1 Std"),
    ("DQ-Regeln", "15 Warnungen behoben", "gestern"),
    ("Neue Medien", "28 Bilder zugeordnet", "gestern"),
];

/// KPI tiles that are not derived from any series.
pub const FIXED_KPIS: &[(&str, &str, &str)] = &[
    ("Artikel gesamt", "1.245.320", "+12k neu"),
    ("Offene Freigaben", "38", "5 überfällig"),
    ("Exporte 24h", "112", "12 Partner"),
];

pub fn quality_trend() -> Result<Vec<DailyScore>> {
    let (y, m, d) = WEEK_START;
    let start = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| Error::InvalidInput(format!("invalid week start {y}-{m}-{d}")))?;
    QUALITY_TREND
        .iter()
        .zip(0u64..)
        .map(|(&value, offset)| {
            let day = start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| Error::InvalidInput("demo week runs past the calendar".into()))?;
            DailyScore::for_date(day, value)
        })
        .collect()
}

pub fn tasks() -> Vec<TaskRecord> {
    vec![
        TaskRecord::new("P-100234", "Bremsbelag-Set DE Übersetzen", TaskStatus::InReview, 74),
        TaskRecord::new("P-100512", "Ölfilter A123 – Medien ergänzen", TaskStatus::New, 41),
        TaskRecord::new("P-100990", "Stoßdämpfer – ACES Mapping", TaskStatus::Active, 92),
        TaskRecord::new("P-101144", "Kühler – Verpackungsdaten GS1", TaskStatus::InReview, 68),
    ]
}

/// The demo tasks, validated. The inline ids are unique, so this never
/// fails; the result type comes from [`Worklist::new`].
pub fn worklist() -> Result<Worklist> {
    Worklist::new(tasks())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{average, kpis};

    #[test]
    fn test_demo_trend_is_one_week() {
        let trend = quality_trend().unwrap();
        assert_eq!(trend.len(), 7);
        assert!(trend.iter().all(|s| s.value() <= 100));
        assert_eq!(average(&trend).unwrap(), 89);
    }

    #[test]
    fn test_demo_trend_labels_follow_the_calendar() {
        let trend = quality_trend().unwrap();
        let labels: Vec<&str> = trend.iter().map(DailyScore::label).collect();
        assert_eq!(labels, ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"]);
    }

    #[test]
    fn test_demo_worklist_is_valid() {
        assert_eq!(worklist().unwrap().len(), 4);
    }

    #[test]
    fn test_demo_kpi_strip() {
        let strip = kpis(&quality_trend().unwrap(), FIXED_KPIS).unwrap();
        assert_eq!(strip.len(), 4);
        assert_eq!(strip[0].value, "89%");
        assert_eq!(strip[0].sub, "+6% seit Mo");
    }

    #[test]
    fn test_channel_share_sums_to_100() {
        let total: u32 = CHANNEL_SHARE.iter().map(|&(_, v)| u32::from(v)).sum();
        assert_eq!(total, 100);
    }
}
