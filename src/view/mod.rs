//! View controller.
//!
//! Maps a navigation selection onto the aggregation builders and arranges
//! the results into a [`Dashboard`] page model. Every call recomputes
//! everything from the table; nothing is carried between selections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::analysis::{self, GoalMetrics, SummaryMetrics};
use crate::models::Table;
use crate::report::charts::{self, Figure, TableSpec};

/// Which page the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ViewType {
    /// Summary metrics and charts over every goal
    #[default]
    Overview,
    /// Radar, bar chart and table for a single goal
    GoalDetails,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::Overview => "overview",
            ViewType::GoalDetails => "goal-details",
        }
    }

    /// Sidebar label.
    pub fn title(&self) -> &'static str {
        match self {
            ViewType::Overview => "Overview",
            ViewType::GoalDetails => "Goal Details",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(ViewType::Overview),
            "goal-details" | "goal_details" | "goal" | "details" => Ok(ViewType::GoalDetails),
            other => Err(format!("unknown view '{}'", other)),
        }
    }
}

/// The user's current selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Navigation {
    pub view: ViewType,
    /// Selected goal; only meaningful for [`ViewType::GoalDetails`].
    pub goal: Option<i64>,
}

impl Navigation {
    pub fn overview() -> Self {
        Self {
            view: ViewType::Overview,
            goal: None,
        }
    }

    pub fn goal_details(goal: Option<i64>) -> Self {
        Self {
            view: ViewType::GoalDetails,
            goal,
        }
    }
}

/// Presentation settings passed down from configuration.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    pub title: String,
    pub chart_height: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            title: "OKR Progress Dashboard".to_string(),
            chart_height: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewPage {
    pub metrics: SummaryMetrics,
    pub goals_chart: Figure,
    pub status_chart: Figure,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalDetailsPage {
    pub goal: i64,
    pub metrics: GoalMetrics,
    pub radar_chart: Figure,
    pub okr_chart: Figure,
    pub table: TableSpec,
}

/// Page content for the resolved navigation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
pub enum Page {
    Overview(OverviewPage),
    GoalDetails(GoalDetailsPage),
    /// Goal details requested but the table has no goals to pick from.
    NoGoals,
}

/// Everything the rendering surface needs for one page.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    /// Navigation after defaults have been applied.
    pub navigation: Navigation,
    /// Goals offered by the goal selector, ascending.
    pub goals: Vec<i64>,
    pub page: Page,
}

/// Build the dashboard for `nav` from `table`.
///
/// Goal Details defaults to the lowest goal when none is selected. A
/// selected goal that is absent from the table renders with empty charts.
pub fn build_dashboard(table: &Table, nav: Navigation, settings: &ViewSettings) -> Dashboard {
    let goals = table.goals();

    let (navigation, page) = match nav.view {
        ViewType::Overview => (Navigation::overview(), overview_page(table, settings)),
        ViewType::GoalDetails => match nav.goal.or_else(|| goals.first().copied()) {
            Some(goal) => (
                Navigation::goal_details(Some(goal)),
                goal_details_page(table, goal, settings),
            ),
            None => (Navigation::goal_details(None), Page::NoGoals),
        },
    };

    debug!("Built {} view (goal: {:?})", navigation.view, navigation.goal);

    Dashboard {
        title: settings.title.clone(),
        generated_at: Utc::now(),
        navigation,
        goals,
        page,
    }
}

fn overview_page(table: &Table, settings: &ViewSettings) -> Page {
    let height = settings.chart_height;

    Page::Overview(OverviewPage {
        metrics: analysis::summary_metrics(table),
        goals_chart: charts::goals_overview_chart(&analysis::goals_overview(table), height),
        status_chart: charts::status_distribution_chart(
            &analysis::status_distribution(table),
            height,
        ),
    })
}

fn goal_details_page(table: &Table, goal: i64, settings: &ViewSettings) -> Page {
    let height = settings.chart_height;

    Page::GoalDetails(GoalDetailsPage {
        goal,
        metrics: analysis::goal_metrics(table, goal),
        radar_chart: charts::objective_radar_chart(
            goal,
            &analysis::objective_radar(table, goal),
            height,
        ),
        okr_chart: charts::okr_progress_chart(goal, &analysis::okr_detail(table, goal), height),
        table: charts::goal_detail_table_spec(goal, &analysis::goal_detail_table(table, goal)),
    })
}
