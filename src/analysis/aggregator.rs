//! OKR aggregation and statistics.
//!
//! Pure functions over a [`Table`] that produce the chart-ready rows the
//! views render. None of them fail: an empty table or an unknown goal
//! yields an empty result, and every mean over zero records is 0.

use crate::models::{OkrRecord, StatusLabel, Table, MAX_STATUS};
use serde::Serialize;
use std::collections::BTreeMap;

/// Completion of one goal, in percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal: i64,
    pub completion_pct: f64,
}

/// Number of records carrying a status label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub label: StatusLabel,
    pub count: usize,
}

/// Average progress of one objective within a goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveProgress {
    pub objective: i64,
    /// Mean status divided by 4, in `[0, 1]` for valid status codes.
    pub normalized_progress: f64,
    pub count: usize,
}

/// Raw status of a single key result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OkrProgress {
    pub okr: String,
    pub objective: i64,
    pub status: i64,
}

/// One row of the goal detail table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRow {
    pub objective: i64,
    pub okr: String,
    pub status_label: StatusLabel,
}

/// Headline numbers for the overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_goals: usize,
    pub total_okrs: usize,
    pub average_completion_pct: f64,
}

/// Headline numbers for a single goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalMetrics {
    pub goal: i64,
    pub total_okrs: usize,
    pub completion_pct: f64,
}

/// Mean status of `records`, or 0 when there are none.
fn mean_status<'a>(records: impl IntoIterator<Item = &'a OkrRecord>) -> f64 {
    let (sum, count) = records
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, count), r| {
            (sum + r.status as f64, count + 1)
        });

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Mean status scaled to `[0, 1]`.
fn normalized<'a>(records: impl IntoIterator<Item = &'a OkrRecord>) -> f64 {
    mean_status(records) / MAX_STATUS as f64
}

/// Group records by a key, keeping table order inside each group.
fn group_by<'a, K: Ord>(
    records: impl IntoIterator<Item = &'a OkrRecord>,
    key: impl Fn(&OkrRecord) -> K,
) -> BTreeMap<K, Vec<&'a OkrRecord>> {
    let mut grouped: BTreeMap<K, Vec<&'a OkrRecord>> = BTreeMap::new();

    for record in records {
        grouped.entry(key(record)).or_default().push(record);
    }

    grouped
}

/// Per-goal completion percentage, ascending by goal.
pub fn goals_overview(table: &Table) -> Vec<GoalProgress> {
    group_by(table.records(), |r| r.goal)
        .into_iter()
        .map(|(goal, records)| GoalProgress {
            goal,
            completion_pct: normalized(records) * 100.0,
        })
        .collect()
}

/// Record count per status label over the whole table, in status order.
///
/// Labels that no record carries are omitted.
pub fn status_distribution(table: &Table) -> Vec<StatusCount> {
    let mut counts: BTreeMap<StatusLabel, usize> = BTreeMap::new();

    for record in table.records() {
        *counts.entry(record.status_label()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(label, count)| StatusCount { label, count })
        .collect()
}

/// Per-objective progress within `goal`, ascending by objective.
pub fn objective_radar(table: &Table, goal: i64) -> Vec<ObjectiveProgress> {
    group_by(table.for_goal(goal), |r| r.objective)
        .into_iter()
        .map(|(objective, records)| ObjectiveProgress {
            objective,
            count: records.len(),
            normalized_progress: normalized(records),
        })
        .collect()
}

/// Raw per-record values within `goal`, in table order.
pub fn okr_detail(table: &Table, goal: i64) -> Vec<OkrProgress> {
    table
        .for_goal(goal)
        .map(|r| OkrProgress {
            okr: r.okr.clone(),
            objective: r.objective,
            status: r.status,
        })
        .collect()
}

/// Detail rows within `goal`, sorted by objective then OKR.
pub fn goal_detail_table(table: &Table, goal: i64) -> Vec<DetailRow> {
    let mut rows: Vec<DetailRow> = table
        .for_goal(goal)
        .map(|r| DetailRow {
            objective: r.objective,
            okr: r.okr.clone(),
            status_label: r.status_label(),
        })
        .collect();

    // Stable sort: rows with equal keys keep their table order.
    rows.sort_by(|a, b| {
        a.objective
            .cmp(&b.objective)
            .then_with(|| a.okr.cmp(&b.okr))
    });

    rows
}

/// Goal count, record count and overall completion for the whole table.
pub fn summary_metrics(table: &Table) -> SummaryMetrics {
    SummaryMetrics {
        total_goals: table.goals().len(),
        total_okrs: table.len(),
        average_completion_pct: normalized(table.records()) * 100.0,
    }
}

/// Record count and completion for a single goal.
pub fn goal_metrics(table: &Table, goal: i64) -> GoalMetrics {
    let records: Vec<&OkrRecord> = table.for_goal(goal).collect();

    GoalMetrics {
        goal,
        total_okrs: records.len(),
        completion_pct: normalized(records.iter().copied()) * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::new(vec![
            OkrRecord::new(1, 1, "1.1.2", 4),
            OkrRecord::new(1, 1, "1.1.1", 2),
            OkrRecord::new(1, 2, "1.2.1", 0),
            OkrRecord::new(2, 1, "2.1.1", 4),
            OkrRecord::new(2, 1, "2.1.2", 4),
            OkrRecord::new(3, 1, "3.1.1", 0),
        ])
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_goals_overview() {
        let overview = goals_overview(&sample_table());

        assert_eq!(overview.len(), 3);
        assert_eq!(overview[0].goal, 1);
        assert_close(overview[0].completion_pct, 50.0);
        assert_close(overview[1].completion_pct, 100.0);
        assert_close(overview[2].completion_pct, 0.0);
    }

    #[test]
    fn test_goals_overview_bounds() {
        let complete = Table::new(vec![
            OkrRecord::new(5, 1, "a", 4),
            OkrRecord::new(5, 2, "b", 4),
        ]);
        let untouched = Table::new(vec![
            OkrRecord::new(5, 1, "a", 0),
            OkrRecord::new(5, 2, "b", 0),
        ]);

        assert_close(goals_overview(&complete)[0].completion_pct, 100.0);
        assert_close(goals_overview(&untouched)[0].completion_pct, 0.0);
    }

    #[test]
    fn test_status_distribution() {
        let dist = status_distribution(&sample_table());

        assert_eq!(
            dist,
            vec![
                StatusCount {
                    label: StatusLabel::NotStarted,
                    count: 2
                },
                StatusCount {
                    label: StatusLabel::Ongoing,
                    count: 1
                },
                StatusCount {
                    label: StatusLabel::Completed,
                    count: 3
                },
            ]
        );
    }

    #[test]
    fn test_status_distribution_counts_unknown() {
        let table = Table::new(vec![
            OkrRecord::new(1, 1, "a", 1),
            OkrRecord::new(1, 1, "b", 9),
        ]);

        let dist = status_distribution(&table);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[1].label, StatusLabel::Unknown);
        assert_eq!(dist[1].count, 1);
    }

    #[test]
    fn test_objective_radar_example() {
        let table = Table::new(vec![
            OkrRecord::new(1, 1, "A", 4),
            OkrRecord::new(1, 1, "B", 0),
        ]);

        assert_eq!(
            objective_radar(&table, 1),
            vec![ObjectiveProgress {
                objective: 1,
                normalized_progress: 0.5,
                count: 2
            }]
        );
    }

    #[test]
    fn test_objective_radar_in_unit_range() {
        let table = sample_table();
        for goal in table.goals() {
            for point in objective_radar(&table, goal) {
                assert!((0.0..=1.0).contains(&point.normalized_progress));
                assert!(point.count > 0);
            }
        }
    }

    #[test]
    fn test_okr_detail_keeps_table_order() {
        let detail = okr_detail(&sample_table(), 1);

        let okrs: Vec<&str> = detail.iter().map(|d| d.okr.as_str()).collect();
        assert_eq!(okrs, vec!["1.1.2", "1.1.1", "1.2.1"]);
        assert_eq!(detail[2].objective, 2);
        assert_eq!(detail[2].status, 0);
    }

    #[test]
    fn test_goal_detail_table_sorted() {
        let rows = goal_detail_table(&sample_table(), 1);

        let keys: Vec<(i64, &str)> = rows.iter().map(|r| (r.objective, r.okr.as_str())).collect();
        assert_eq!(keys, vec![(1, "1.1.1"), (1, "1.1.2"), (2, "1.2.1")]);
        assert_eq!(rows[0].status_label, StatusLabel::Ongoing);
        assert_eq!(rows[1].status_label, StatusLabel::Completed);
    }

    #[test]
    fn test_goal_detail_table_is_stable() {
        let table = Table::new(vec![
            OkrRecord::new(1, 2, "x", 1),
            OkrRecord::new(1, 1, "dup", 3),
            OkrRecord::new(1, 1, "dup", 0),
        ]);

        let rows = goal_detail_table(&table, 1);
        assert_eq!(rows[0].status_label, StatusLabel::Optimizing);
        assert_eq!(rows[1].status_label, StatusLabel::NotStarted);
        assert_eq!(rows[2].okr, "x");
    }

    #[test]
    fn test_builders_tolerate_empty_input() {
        let empty = Table::default();

        assert!(goals_overview(&empty).is_empty());
        assert!(status_distribution(&empty).is_empty());
        assert!(objective_radar(&empty, 42).is_empty());
        assert!(okr_detail(&empty, 42).is_empty());
        assert!(goal_detail_table(&empty, 42).is_empty());

        let summary = summary_metrics(&empty);
        assert_eq!(summary.total_goals, 0);
        assert_eq!(summary.total_okrs, 0);
        assert_close(summary.average_completion_pct, 0.0);

        let metrics = goal_metrics(&empty, 42);
        assert_eq!(metrics.total_okrs, 0);
        assert_close(metrics.completion_pct, 0.0);
    }

    #[test]
    fn test_unknown_goal_yields_empty_results() {
        let table = sample_table();

        assert!(objective_radar(&table, 99).is_empty());
        assert!(okr_detail(&table, 99).is_empty());
        assert!(goal_detail_table(&table, 99).is_empty());
    }

    #[test]
    fn test_summary_metrics() {
        let summary = summary_metrics(&sample_table());

        assert_eq!(summary.total_goals, 3);
        assert_eq!(summary.total_okrs, 6);
        // (4 + 2 + 0 + 4 + 4 + 0) / 6 / 4 * 100
        assert_close(summary.average_completion_pct, 14.0 / 24.0 * 100.0);
    }

    #[test]
    fn test_goal_metrics() {
        let metrics = goal_metrics(&sample_table(), 2);

        assert_eq!(metrics.goal, 2);
        assert_eq!(metrics.total_okrs, 2);
        assert_close(metrics.completion_pct, 100.0);
    }

    #[test]
    fn test_means_with_huge_status_codes() {
        let table = Table::new(vec![
            OkrRecord::new(1, 1, "a", i64::MAX),
            OkrRecord::new(1, 2, "b", i64::MAX),
        ]);

        let overview = goals_overview(&table);
        assert!(overview[0].completion_pct.is_finite());
        assert!(overview[0].completion_pct > 0.0);

        let summary = summary_metrics(&table);
        assert!(summary.average_completion_pct.is_finite());
        assert_eq!(objective_radar(&table, 1).len(), 2);
    }
}
