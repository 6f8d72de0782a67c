//! Worklist records and the status/search filter over them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    New,
    InReview,
    Active,
    Blocked,
}

impl TaskStatus {
    pub const ALL: &[TaskStatus] = &[
        TaskStatus::New,
        TaskStatus::InReview,
        TaskStatus::Active,
        TaskStatus::Blocked,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::New => "Neu",
            TaskStatus::InReview => "In Prüfung",
            TaskStatus::Active => "Aktiv",
            TaskStatus::Blocked => "Gesperrt",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    /// Data-quality score, 0–100.
    pub quality_score: u8,
}

impl TaskRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>, status: TaskStatus, quality_score: u8) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            status,
            quality_score,
        }
    }
}

/// Records as handed over by the data loader, checked once on the way in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Worklist {
    records: Vec<TaskRecord>,
}

impl Worklist {
    pub fn new(records: Vec<TaskRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for r in &records {
            if !seen.insert(r.id.as_str()) {
                return Err(Error::DuplicateId(r.id.clone()));
            }
            if r.quality_score > 100 {
                return Err(Error::InvalidInput(format!(
                    "record {} has quality score {}",
                    r.id, r.quality_score
                )));
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn filtered(&self, filter: &FilterState) -> Vec<&TaskRecord> {
        apply(&self.records, filter)
    }
}

/// Active status set plus search text. Empty means "no restriction" for
/// both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub active_statuses: BTreeSet<TaskStatus>,
    pub search_text: String,
}

impl FilterState {
    pub fn toggle_status(&mut self, status: TaskStatus) {
        if !self.active_statuses.remove(&status) {
            self.active_statuses.insert(status);
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn clear(&mut self) {
        self.active_statuses.clear();
        self.search_text.clear();
    }

    pub fn is_unfiltered(&self) -> bool {
        self.active_statuses.is_empty() && self.search_text.trim().is_empty()
    }
}

/// Records passing both the status and the text predicate, in input order.
pub fn apply<'a>(records: &'a [TaskRecord], filter: &FilterState) -> Vec<&'a TaskRecord> {
    let needle = filter.search_text.trim().to_lowercase();
    records
        .iter()
        .filter(|r| filter.active_statuses.is_empty() || filter.active_statuses.contains(&r.status))
        .filter(|r| {
            needle.is_empty()
                || r.title.to_lowercase().contains(&needle)
                || r.id.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Number of records per status, in [`TaskStatus::ALL`] order.
pub fn status_counts(records: &[TaskRecord]) -> Vec<(TaskStatus, usize)> {
    TaskStatus::ALL
        .iter()
        .map(|&s| (s, records.iter().filter(|r| r.status == s).count()))
        .collect()
}

/// Tab-separated lines for the "copy to clipboard" action.
pub fn clipboard_text(records: &[&TaskRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}\t{}\t{}\t{}%", r.id, r.title, r.status, r.quality_score))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TaskRecord> {
        vec![
            TaskRecord::new("P-100234", "Bremsbelag-Set DE Übersetzen", TaskStatus::InReview, 74),
            TaskRecord::new("P-100512", "Ölfilter A123 – Medien ergänzen", TaskStatus::New, 41),
            TaskRecord::new("P-100990", "Stoßdämpfer – ACES Mapping", TaskStatus::Active, 92),
            TaskRecord::new("P-101144", "Kühler – Verpackungsdaten GS1", TaskStatus::InReview, 68),
        ]
    }

    fn ids<'a>(records: &[&'a TaskRecord]) -> Vec<&'a str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let records = sample();
        let out = apply(&records, &FilterState::default());
        assert_eq!(out.len(), records.len());
        assert!(out.iter().zip(&records).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_status_filter_keeps_order() {
        let records = sample();
        let mut f = FilterState::default();
        f.toggle_status(TaskStatus::InReview);
        assert_eq!(ids(&apply(&records, &f)), vec!["P-100234", "P-101144"]);
    }

    #[test]
    fn test_multiple_statuses() {
        let records = sample();
        let mut f = FilterState::default();
        f.toggle_status(TaskStatus::New);
        f.toggle_status(TaskStatus::Active);
        assert_eq!(ids(&apply(&records, &f)), vec!["P-100512", "P-100990"]);
    }

    #[test]
    fn test_toggle_twice_removes_status() {
        let mut f = FilterState::default();
        f.toggle_status(TaskStatus::Blocked);
        f.toggle_status(TaskStatus::Blocked);
        assert!(f.is_unfiltered());
    }

    #[test]
    fn test_search_is_case_insensitive_unicode() {
        let records = sample();
        let mut f = FilterState::default();
        f.set_search("ölfilter");
        assert_eq!(ids(&apply(&records, &f)), vec!["P-100512"]);
        f.set_search("STOSSDÄMPFER");
        assert!(apply(&records, &f).is_empty());
        f.set_search("STOßDÄMPFER");
        assert_eq!(ids(&apply(&records, &f)), vec!["P-100990"]);
    }

    #[test]
    fn test_search_matches_id() {
        let records = sample();
        let mut f = FilterState::default();
        f.set_search("p-1011");
        assert_eq!(ids(&apply(&records, &f)), vec!["P-101144"]);
    }

    #[test]
    fn test_whitespace_only_search_matches_all() {
        let records = sample();
        let mut f = FilterState::default();
        f.set_search("   ");
        assert_eq!(apply(&records, &f).len(), 4);
    }

    #[test]
    fn test_predicates_are_anded() {
        let records = sample();
        let mut f = FilterState::default();
        f.toggle_status(TaskStatus::InReview);
        f.set_search("kühler");
        assert_eq!(ids(&apply(&records, &f)), vec!["P-101144"]);
        f.set_search("ölfilter");
        assert!(apply(&records, &f).is_empty());
    }

    #[test]
    fn test_output_is_subsequence() {
        let records = sample();
        for &status in TaskStatus::ALL {
            for needle in ["", "–", "p-10", "mapping", "x"] {
                let mut f = FilterState::default();
                f.toggle_status(status);
                f.set_search(needle);
                let out = apply(&records, &f);
                let mut pos = 0;
                for r in out {
                    let idx = records[pos..].iter().position(|x| x == r).unwrap();
                    pos += idx + 1;
                }
            }
        }
    }

    #[test]
    fn test_worklist_rejects_duplicate_ids() {
        let mut records = sample();
        records.push(TaskRecord::new("P-100512", "dup", TaskStatus::New, 10));
        assert_eq!(Worklist::new(records), Err(Error::DuplicateId("P-100512".into())));
    }

    #[test]
    fn test_worklist_rejects_bad_score() {
        let records = vec![TaskRecord::new("P-1", "x", TaskStatus::New, 120)];
        assert!(matches!(Worklist::new(records), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_status_counts() {
        let counts = status_counts(&sample());
        assert_eq!(
            counts,
            vec![
                (TaskStatus::New, 1),
                (TaskStatus::InReview, 2),
                (TaskStatus::Active, 1),
                (TaskStatus::Blocked, 0),
            ]
        );
    }

    #[test]
    fn test_clipboard_text() {
        let records = sample();
        let list = Worklist::new(records).unwrap();
        let mut f = FilterState::default();
        f.toggle_status(TaskStatus::Active);
        let text = clipboard_text(&list.filtered(&f));
        assert_eq!(text, "P-100990\tStoßdämpfer – ACES Mapping\tAktiv\t92%");
    }
}
