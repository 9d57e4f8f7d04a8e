//! HTML page generation.
//!
//! Builds a single self-contained page per view: a sidebar with the view
//! links and goal selector, metric cards, one Plotly chart per figure and
//! an HTML detail table.

use crate::analysis::{GoalMetrics, SummaryMetrics};
use crate::report::charts::{Figure, TableSpec};
use crate::view::{Dashboard, GoalDetailsPage, OverviewPage, Page, ViewType};

const STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; color: #262730; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 240px; padding: 2rem 1rem; background: #f0f2f6; }
.sidebar h2 { margin-top: 0; }
.sidebar a { display: block; padding: 0.3rem 0; color: #262730; }
.sidebar a.active { font-weight: bold; }
.main { flex: 1; padding: 2rem; max-width: 100%; }
.metrics { display: flex; gap: 2rem; margin-bottom: 1.5rem; }
.metric .label { font-size: 0.9rem; color: #6b6f76; }
.metric .value { font-size: 2rem; }
.columns { display: flex; gap: 1rem; }
.columns > div { flex: 1; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.4rem 0.8rem; border-bottom: 1px solid #e6e9ef; }
.error { padding: 1rem; background: #ffe9e9; color: #7d1a1a; border-radius: 0.5rem; }
.info { padding: 1rem; background: #e8f1fb; border-radius: 0.5rem; }
"#;

/// Page assets that come from configuration.
#[derive(Debug, Clone)]
pub struct PageAssets {
    /// Script URL for Plotly.js.
    pub plotly_url: String,
}

impl Default for PageAssets {
    fn default() -> Self {
        Self {
            plotly_url: "https://cdn.plot.ly/plotly-2.35.2.min.js".to_string(),
        }
    }
}

/// Generate the complete HTML page for a dashboard.
pub fn generate_html_page(dashboard: &Dashboard, assets: &PageAssets) -> String {
    let mut body = String::new();

    body.push_str(&generate_sidebar(dashboard));
    body.push_str("<main class=\"main\">\n");
    body.push_str(&format!("<h1>{}</h1>\n", escape_html(&dashboard.title)));

    match &dashboard.page {
        Page::Overview(page) => body.push_str(&generate_overview_section(page)),
        Page::GoalDetails(page) => body.push_str(&generate_goal_details_section(page)),
        Page::NoGoals => {
            body.push_str("<div class=\"info\">No goals are available in the loaded data.</div>\n")
        }
    }

    body.push_str(&generate_footer(dashboard));
    body.push_str("</main>\n");

    wrap_document(&dashboard.title, assets, &body)
}

/// Generate the blocking page shown when the data cannot be loaded.
pub fn generate_error_page(title: &str, message: &str, assets: &PageAssets) -> String {
    let body = format!(
        "<main class=\"main\">\n<h1>{}</h1>\n<div class=\"error\">{}</div>\n</main>\n",
        escape_html(title),
        escape_html(message)
    );

    wrap_document(title, assets, &body)
}

fn wrap_document(title: &str, assets: &PageAssets, body: &str) -> String {
    let mut output = String::new();

    output.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    output.push_str("<meta charset=\"utf-8\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str(&format!(
        "<script src=\"{}\"></script>\n",
        escape_html(&assets.plotly_url)
    ));
    output.push_str(&format!("<style>{}</style>\n", STYLE));
    output.push_str("</head>\n<body>\n<div class=\"layout\">\n");
    output.push_str(body);
    output.push_str("</div>\n</body>\n</html>\n");

    output
}

/// Sidebar with view links and, on the detail view, the goal selector.
fn generate_sidebar(dashboard: &Dashboard) -> String {
    let mut section = String::new();
    let current = dashboard.navigation.view;

    section.push_str("<nav class=\"sidebar\">\n<h2>Navigation</h2>\n");

    for view in [ViewType::Overview, ViewType::GoalDetails] {
        let class = if view == current { " class=\"active\"" } else { "" };
        section.push_str(&format!(
            "<a href=\"?view={}\"{}>{}</a>\n",
            view.as_str(),
            class,
            view.title()
        ));
    }

    if current == ViewType::GoalDetails && !dashboard.goals.is_empty() {
        section.push_str("<form method=\"get\">\n");
        section.push_str(&format!(
            "<input type=\"hidden\" name=\"view\" value=\"{}\">\n",
            ViewType::GoalDetails.as_str()
        ));
        section.push_str("<label for=\"goal\">Select Goal</label>\n");
        section.push_str("<select id=\"goal\" name=\"goal\" onchange=\"this.form.submit()\">\n");
        for goal in &dashboard.goals {
            let selected = if dashboard.navigation.goal == Some(*goal) {
                " selected"
            } else {
                ""
            };
            section.push_str(&format!(
                "<option value=\"{}\"{}>Goal {}</option>\n",
                goal, selected, goal
            ));
        }
        section.push_str("</select>\n</form>\n");
    }

    section.push_str("</nav>\n");

    section
}

fn generate_overview_section(page: &OverviewPage) -> String {
    let mut section = String::new();

    section.push_str(&generate_summary_metrics(&page.metrics));
    section.push_str("<h3>Goals Overview</h3>\n");
    section.push_str(&generate_chart("goals-overview", &page.goals_chart));
    section.push_str("<h3>Status Distribution</h3>\n");
    section.push_str(&generate_chart("status-distribution", &page.status_chart));

    section
}

fn generate_goal_details_section(page: &GoalDetailsPage) -> String {
    let mut section = String::new();

    section.push_str(&generate_goal_metrics(&page.metrics));
    section.push_str("<div class=\"columns\">\n<div>\n");
    section.push_str(&generate_chart("objective-radar", &page.radar_chart));
    section.push_str("</div>\n<div>\n");
    section.push_str(&generate_chart("okr-progress", &page.okr_chart));
    section.push_str("</div>\n</div>\n");
    section.push_str(&generate_table(&page.table));

    section
}

fn generate_summary_metrics(metrics: &SummaryMetrics) -> String {
    let mut section = String::from("<div class=\"metrics\">\n");

    section.push_str(&generate_metric("Total Goals", &metrics.total_goals.to_string()));
    section.push_str(&generate_metric("Total OKRs", &metrics.total_okrs.to_string()));
    section.push_str(&generate_metric(
        "Average Completion",
        &format!("{:.1}%", metrics.average_completion_pct),
    ));
    section.push_str("</div>\n");

    section
}

fn generate_goal_metrics(metrics: &GoalMetrics) -> String {
    let mut section = String::from("<div class=\"metrics\">\n");

    section.push_str(&generate_metric("Total OKRs", &metrics.total_okrs.to_string()));
    section.push_str(&generate_metric(
        "Goal Completion",
        &format!("{:.1}%", metrics.completion_pct),
    ));
    section.push_str("</div>\n");

    section
}

fn generate_metric(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>\n",
        escape_html(label),
        escape_html(value)
    )
}

/// A chart container plus the script that draws it.
fn generate_chart(id: &str, figure: &Figure) -> String {
    let json = serde_json::to_string(figure).unwrap_or_else(|_| "{\"data\":[]}".to_string());
    let note = if figure.is_empty() {
        "<p class=\"info\">No data to display.</p>\n"
    } else {
        ""
    };

    format!(
        "{note}<div id=\"{id}\"></div>\n<script>(function () {{ var fig = {json}; \
         Plotly.newPlot(\"{id}\", fig.data, fig.layout, {{responsive: true}}); }})();</script>\n",
        note = note,
        id = id,
        json = script_safe(&json)
    )
}

fn generate_table(spec: &TableSpec) -> String {
    let mut section = String::new();

    section.push_str(&format!("<h3>{}</h3>\n", escape_html(&spec.title)));
    section.push_str("<table>\n<thead><tr>");
    for (_, name) in &spec.columns {
        section.push_str(&format!("<th>{}</th>", escape_html(name)));
    }
    section.push_str("</tr></thead>\n<tbody>\n");

    for row in &spec.rows {
        section.push_str("<tr>");
        for cell in row {
            section.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        section.push_str("</tr>\n");
    }

    section.push_str("</tbody>\n</table>\n");

    section
}

fn generate_footer(dashboard: &Dashboard) -> String {
    format!(
        "<footer><p><small>Generated {}</small></p></footer>\n",
        dashboard.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
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

/// Make serialized JSON safe to inline inside a `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
