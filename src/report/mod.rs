//! Rendering of dashboard pages.
//!
//! Chart and table specifications live in [`charts`]; [`html`] turns a
//! dashboard into a browser page. The JSON form is the serialized
//! [`Dashboard`] model itself.

pub mod charts;
pub mod html;

pub use html::{generate_error_page, generate_html_page, PageAssets};

use crate::view::Dashboard;
use anyhow::Result;
use serde::Serialize;

/// Generate a JSON representation of the dashboard.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// JSON body returned when the data cannot be loaded.
#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    pub error: &'a str,
}

/// Generate the JSON error body for a blocking load failure.
pub fn generate_json_error(message: &str) -> Result<String> {
    serde_json::to_string_pretty(&ErrorReport { error: message }).map_err(Into::into)
}
