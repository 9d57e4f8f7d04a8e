//! Chart and table specifications for the rendering surface.
//!
//! Figures serialize to the Plotly.js `{data, layout}` shape so the page
//! can hand them straight to `Plotly.newPlot`.

use crate::analysis::{DetailRow, GoalProgress, ObjectiveProgress, OkrProgress, StatusCount};
use serde::Serialize;
use std::collections::BTreeMap;

/// A complete Plotly figure.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Whether the figure has nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(Trace::is_empty)
    }
}

/// Plotly trace, tagged by its `type` field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    Pie(PieTrace),
    Scatterpolar(PolarTrace),
}

impl Trace {
    fn is_empty(&self) -> bool {
        match self {
            Trace::Bar(t) => t.x.is_empty(),
            Trace::Pie(t) => t.values.is_empty(),
            Trace::Scatterpolar(t) => t.r.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hovertext: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PieTrace {
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolarTrace {
    pub r: Vec<f64>,
    pub theta: Vec<String>,
    pub fill: &'static str,
    pub name: String,
    pub hovertext: Vec<String>,
    pub hoverinfo: &'static str,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polar: Option<Polar>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Legend {
    pub title: Title,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Axis {
    pub title: Title,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Polar {
    pub radialaxis: RadialAxis,
}

#[derive(Debug, Clone, Serialize)]
pub struct RadialAxis {
    pub visible: bool,
    pub range: [f64; 2],
    pub tickformat: &'static str,
}

/// Display specification for a rendered table.
#[derive(Debug, Clone, Serialize)]
pub struct TableSpec {
    pub title: String,
    /// `(field, display name)` pairs, in display order.
    pub columns: Vec<(&'static str, &'static str)>,
    pub rows: Vec<Vec<String>>,
}

/// Bar chart of per-goal completion.
pub fn goals_overview_chart(progress: &[GoalProgress], height: u32) -> Figure {
    let trace = BarTrace {
        x: progress.iter().map(|p| p.goal.to_string()).collect(),
        y: progress.iter().map(|p| p.completion_pct).collect(),
        name: None,
        hovertext: progress
            .iter()
            .map(|p| format!("Goal {}<br>Completion: {:.1}%", p.goal, p.completion_pct))
            .collect(),
    };

    Figure {
        data: vec![Trace::Bar(trace)],
        layout: Layout {
            title: Title::new("Goals Progress Overview"),
            height,
            xaxis: Some(Axis {
                title: Title::new("Goal"),
                kind: Some("category"),
                range: None,
            }),
            yaxis: Some(Axis {
                title: Title::new("Completion %"),
                kind: None,
                range: Some([0.0, 100.0]),
            }),
            ..Layout::default()
        },
    }
}

/// Pie chart of the status label distribution.
pub fn status_distribution_chart(counts: &[StatusCount], height: u32) -> Figure {
    let trace = PieTrace {
        labels: counts.iter().map(|c| c.label.to_string()).collect(),
        values: counts.iter().map(|c| c.count).collect(),
    };

    Figure {
        data: vec![Trace::Pie(trace)],
        layout: Layout {
            title: Title::new("Overall Status Distribution"),
            height,
            ..Layout::default()
        },
    }
}

/// Radar chart with one axis per objective of `goal`.
pub fn objective_radar_chart(goal: i64, points: &[ObjectiveProgress], height: u32) -> Figure {
    let trace = PolarTrace {
        r: points.iter().map(|p| p.normalized_progress).collect(),
        theta: points.iter().map(|p| format!("Obj {}", p.objective)).collect(),
        fill: "toself",
        name: format!("Goal {}", goal),
        hovertext: points
            .iter()
            .map(|p| {
                format!(
                    "Objective {}<br>Progress: {:.1}%<br>OKRs: {}",
                    p.objective,
                    p.normalized_progress * 100.0,
                    p.count
                )
            })
            .collect(),
        hoverinfo: "text",
    };

    Figure {
        data: vec![Trace::Scatterpolar(trace)],
        layout: Layout {
            title: Title::new(format!("Goal {} Objective Progress", goal)),
            height,
            showlegend: Some(false),
            polar: Some(Polar {
                radialaxis: RadialAxis {
                    visible: true,
                    range: [0.0, 1.0],
                    tickformat: ".0%",
                },
            }),
            ..Layout::default()
        },
    }
}

/// Bar chart of raw OKR status within `goal`, one colored trace per objective.
pub fn okr_progress_chart(goal: i64, okrs: &[OkrProgress], height: u32) -> Figure {
    let mut by_objective: BTreeMap<i64, Vec<&OkrProgress>> = BTreeMap::new();
    for okr in okrs {
        by_objective.entry(okr.objective).or_default().push(okr);
    }

    let data = by_objective
        .into_iter()
        .map(|(objective, okrs)| {
            Trace::Bar(BarTrace {
                x: okrs.iter().map(|o| o.okr.clone()).collect(),
                y: okrs.iter().map(|o| o.status as f64).collect(),
                name: Some(objective.to_string()),
                hovertext: okrs
                    .iter()
                    .map(|o| {
                        format!(
                            "OKR: {}<br>Progress: {}<br>Objective: {}",
                            o.okr, o.status, objective
                        )
                    })
                    .collect(),
            })
        })
        .collect();

    Figure {
        data,
        layout: Layout {
            title: Title::new(format!("Individual OKR Progress - Goal {}", goal)),
            height,
            barmode: Some("group"),
            legend: Some(Legend {
                title: Title::new("Objective"),
            }),
            xaxis: Some(Axis {
                title: Title::new("OKR"),
                kind: Some("category"),
                range: None,
            }),
            yaxis: Some(Axis {
                title: Title::new("Progress"),
                kind: None,
                range: Some([0.0, 4.0]),
            }),
            ..Layout::default()
        },
    }
}

/// Detail table for `goal` with Objective / OKR / Status columns.
pub fn goal_detail_table_spec(goal: i64, rows: &[DetailRow]) -> TableSpec {
    TableSpec {
        title: format!("Goal {} Details", goal),
        columns: vec![
            ("objective", "Objective"),
            ("okr", "OKR"),
            ("status_label", "Status"),
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.objective.to_string(),
                    r.okr.clone(),
                    r.status_label.to_string(),
                ]
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatusLabel;

    #[test]
    fn test_trace_type_tag() {
        let figure = status_distribution_chart(
            &[StatusCount {
                label: StatusLabel::Completed,
                count: 3,
            }],
            400,
        );
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "pie");
        assert_eq!(json["data"][0]["labels"][0], "Completed");
        assert_eq!(json["layout"]["title"]["text"], "Overall Status Distribution");
        assert!(json["layout"].get("xaxis").is_none());
    }

    #[test]
    fn test_goals_overview_chart_range() {
        let figure = goals_overview_chart(
            &[GoalProgress {
                goal: 2,
                completion_pct: 75.0,
            }],
            400,
        );
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["x"][0], "2");
        assert_eq!(json["layout"]["yaxis"]["range"][1], 100.0);
        assert_eq!(json["layout"]["xaxis"]["type"], "category");
    }

    #[test]
    fn test_objective_radar_chart() {
        let figure = objective_radar_chart(
            3,
            &[ObjectiveProgress {
                objective: 1,
                normalized_progress: 0.5,
                count: 2,
            }],
            400,
        );
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "scatterpolar");
        assert_eq!(json["data"][0]["theta"][0], "Obj 1");
        assert_eq!(
            json["data"][0]["hovertext"][0],
            "Objective 1<br>Progress: 50.0%<br>OKRs: 2"
        );
        assert_eq!(json["layout"]["polar"]["radialaxis"]["tickformat"], ".0%");
        assert_eq!(json["layout"]["showlegend"], false);
        assert_eq!(json["layout"]["title"]["text"], "Goal 3 Objective Progress");
    }

    #[test]
    fn test_okr_progress_chart_traces_per_objective() {
        let okrs = vec![
            OkrProgress {
                okr: "1.2.1".to_string(),
                objective: 2,
                status: 1,
            },
            OkrProgress {
                okr: "1.1.1".to_string(),
                objective: 1,
                status: 3,
            },
            OkrProgress {
                okr: "1.1.2".to_string(),
                objective: 1,
                status: 4,
            },
        ];
        let figure = okr_progress_chart(1, &okrs, 400);

        assert_eq!(figure.data.len(), 2);
        match &figure.data[0] {
            Trace::Bar(bar) => {
                assert_eq!(bar.name.as_deref(), Some("1"));
                assert_eq!(bar.x, vec!["1.1.1", "1.1.2"]);
                assert_eq!(bar.y, vec![3.0, 4.0]);
            }
            other => panic!("expected bar trace, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_inputs_give_empty_figures() {
        assert!(goals_overview_chart(&[], 400).is_empty());
        assert!(status_distribution_chart(&[], 400).is_empty());
        assert!(objective_radar_chart(1, &[], 400).is_empty());
        assert!(okr_progress_chart(1, &[], 400).is_empty());
        assert!(goal_detail_table_spec(1, &[]).rows.is_empty());
    }

    #[test]
    fn test_goal_detail_table_spec_columns() {
        let spec = goal_detail_table_spec(
            4,
            &[DetailRow {
                objective: 1,
                okr: "4.1.1".to_string(),
                status_label: StatusLabel::Planned,
            }],
        );

        let names: Vec<&str> = spec.columns.iter().map(|(_, name)| *name).collect();
        assert_eq!(names, vec!["Objective", "OKR", "Status"]);
        assert_eq!(spec.rows[0], vec!["1", "4.1.1", "Planned"]);
        assert_eq!(spec.title, "Goal 4 Details");
    }
}
