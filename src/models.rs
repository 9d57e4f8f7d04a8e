//! Data models for the OKR dashboard.
//!
//! This module contains the core record and table types loaded from the
//! input file, plus the status code mapping shared by every view.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest status code; a record at this status is fully complete.
pub const MAX_STATUS: i64 = 4;

/// Progress stage of a key result, derived from its numeric status code.
///
/// The five stages cover codes `0..=4`. Any other code maps to
/// [`StatusLabel::Unknown`] so that a stray value in the input file still
/// renders instead of disappearing from the distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusLabel {
    #[serde(rename = "Not Started")]
    NotStarted,
    Planned,
    Ongoing,
    Optimizing,
    Completed,
    Unknown,
}

impl StatusLabel {
    /// Map a raw status code to its label.
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => StatusLabel::NotStarted,
            1 => StatusLabel::Planned,
            2 => StatusLabel::Ongoing,
            3 => StatusLabel::Optimizing,
            4 => StatusLabel::Completed,
            _ => StatusLabel::Unknown,
        }
    }

    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::NotStarted => "Not Started",
            StatusLabel::Planned => "Planned",
            StatusLabel::Ongoing => "Ongoing",
            StatusLabel::Optimizing => "Optimizing",
            StatusLabel::Completed => "Completed",
            StatusLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single key result row from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OkrRecord {
    /// Goal the record belongs to.
    pub goal: i64,
    /// Objective within the goal.
    pub objective: i64,
    /// Identifier of the key result.
    pub okr: String,
    /// Raw progress code, nominally `0..=4`.
    pub status: i64,
}

impl OkrRecord {
    pub fn new(goal: i64, objective: i64, okr: impl Into<String>, status: i64) -> Self {
        Self {
            goal,
            objective,
            okr: okr.into(),
            status,
        }
    }

    /// Label derived from the status code. Always recomputed, never stored.
    pub fn status_label(&self) -> StatusLabel {
        StatusLabel::from_code(self.status)
    }

    /// Whether the status code falls inside the known range.
    pub fn has_known_status(&self) -> bool {
        (0..=MAX_STATUS).contains(&self.status)
    }
}

/// The immutable in-memory table of OKR records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    records: Vec<OkrRecord>,
}

impl Table {
    pub fn new(records: Vec<OkrRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OkrRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records belonging to `goal`, in table order.
    pub fn for_goal(&self, goal: i64) -> impl Iterator<Item = &OkrRecord> + '_ {
        self.records.iter().filter(move |r| r.goal == goal)
    }

    /// Distinct goal identifiers, ascending.
    pub fn goals(&self) -> Vec<i64> {
        let mut goals: Vec<i64> = self.records.iter().map(|r| r.goal).collect();
        goals.sort_unstable();
        goals.dedup();
        goals
    }

    /// Number of records whose status code is outside `0..=4`.
    pub fn unknown_status_count(&self) -> usize {
        self.records.iter().filter(|r| !r.has_known_status()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label_mapping() {
        assert_eq!(StatusLabel::from_code(0).as_str(), "Not Started");
        assert_eq!(StatusLabel::from_code(1).as_str(), "Planned");
        assert_eq!(StatusLabel::from_code(2).as_str(), "Ongoing");
        assert_eq!(StatusLabel::from_code(3).as_str(), "Optimizing");
        assert_eq!(StatusLabel::from_code(4).as_str(), "Completed");
    }

    #[test]
    fn test_status_label_out_of_range() {
        assert_eq!(StatusLabel::from_code(-1), StatusLabel::Unknown);
        assert_eq!(StatusLabel::from_code(5), StatusLabel::Unknown);
        assert_eq!(StatusLabel::from_code(i64::MAX).to_string(), "Unknown");
    }

    #[test]
    fn test_status_label_ordering() {
        assert!(StatusLabel::NotStarted < StatusLabel::Planned);
        assert!(StatusLabel::Optimizing < StatusLabel::Completed);
        assert!(StatusLabel::Completed < StatusLabel::Unknown);
    }

    #[test]
    fn test_status_label_serializes_display_name() {
        let json = serde_json::to_string(&StatusLabel::NotStarted).unwrap();
        assert_eq!(json, "\"Not Started\"");
    }

    #[test]
    fn test_record_label_follows_status() {
        let mut record = OkrRecord::new(1, 1, "1.1.1", 2);
        assert_eq!(record.status_label(), StatusLabel::Ongoing);

        record.status = 4;
        assert_eq!(record.status_label(), StatusLabel::Completed);
        assert!(record.has_known_status());

        record.status = 9;
        assert!(!record.has_known_status());
    }

    #[test]
    fn test_table_goals_sorted_and_distinct() {
        let table = Table::new(vec![
            OkrRecord::new(3, 1, "a", 0),
            OkrRecord::new(1, 1, "b", 1),
            OkrRecord::new(3, 2, "c", 2),
            OkrRecord::new(2, 1, "d", 3),
        ]);

        assert_eq!(table.goals(), vec![1, 2, 3]);
        assert_eq!(table.for_goal(3).count(), 2);
        assert_eq!(table.for_goal(7).count(), 0);
    }

    #[test]
    fn test_unknown_status_count() {
        let table = Table::new(vec![
            OkrRecord::new(1, 1, "a", 0),
            OkrRecord::new(1, 1, "b", 6),
            OkrRecord::new(1, 1, "c", -2),
        ]);
        assert_eq!(table.unknown_status_count(), 2);
    }
}
