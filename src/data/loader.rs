//! CSV loading and the process-wide table cache.
//!
//! The input file is read with polars and converted into a plain
//! [`Table`] of [`OkrRecord`]s. Every failure, from a missing file to a
//! null status cell, collapses into [`DataError::DataUnavailable`].

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::data::schema;
use crate::error::DataError;
use crate::models::{OkrRecord, Table};

/// Read every record from the CSV file at `path`.
pub fn load_table(path: &Path) -> Result<Table, DataError> {
    if !path.is_file() {
        return Err(DataError::unavailable(path, "file not found"));
    }

    debug!("Reading OKR data from {}", path.display());

    // Every column is read as text; integer columns are parsed per cell
    // so identifiers like `1.10` or `01` keep their exact spelling.
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| DataError::unavailable(path, e))?;

    let records = records_from_frame(&df).map_err(|reason| DataError::unavailable(path, reason))?;
    let table = Table::new(records);

    info!(
        "Loaded {} OKR records across {} goals from {}",
        table.len(),
        table.goals().len(),
        path.display()
    );

    if table.is_empty() {
        warn!("{} contains no OKR records", path.display());
    }

    let unknown = table.unknown_status_count();
    if unknown > 0 {
        warn!(
            "{} records have a status outside 0-4 and will be labelled Unknown",
            unknown
        );
    }

    Ok(table)
}

/// Convert a parsed frame into records, validating the required columns.
fn records_from_frame(df: &DataFrame) -> Result<Vec<OkrRecord>, String> {
    let goals = str_column(df, schema::GOAL)?;
    let objectives = str_column(df, schema::OBJECTIVE)?;
    let okrs = str_column(df, schema::OKR)?;
    let statuses = str_column(df, schema::STATUS)?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = i + 1;
        let text = text_getter(|values: &StringChunked, name: &str| {
            values
                .get(i)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("empty '{}' value in data row {}", name, row))
        });
        let int = |values: &StringChunked, name: &str| {
            let value = text(values, name)?;
            value.parse::<i64>().map_err(|_| {
                format!(
                    "column '{}' must contain integers, found '{}' in data row {}",
                    name, value, row
                )
            })
        };

        let goal = int(&goals, schema::GOAL)?;
        let objective = int(&objectives, schema::OBJECTIVE)?;
        let okr = text(&okrs, schema::OKR)?;
        let status = int(&statuses, schema::STATUS)?;

        records.push(OkrRecord::new(goal, objective, okr, status));
    }

    Ok(records)
}

/// Pin a cell-reading closure to a signature whose output borrows from the column.
fn text_getter<F>(f: F) -> F
where
    F: for<'a> Fn(&'a StringChunked, &str) -> Result<&'a str, String>,
{
    f
}

/// Fetch a required column as text.
fn str_column(df: &DataFrame, name: &str) -> Result<StringChunked, String> {
    let column = df
        .column(name)
        .map_err(|_| format!("missing required column '{}'", name))?;
    let values = column.str().map_err(|e| e.to_string())?;
    Ok(values.clone())
}

/// Lazily loaded, init-once handle on the OKR table.
///
/// The first successful [`DataSource::table`] call reads the file; every
/// later call returns the same reference without touching the disk. A
/// failed load is not remembered, so the next call tries again.
#[derive(Debug)]
pub struct DataSource {
    path: PathBuf,
    table: OnceCell<Table>,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    /// Path of the backing CSV file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached table, loading it on first access.
    pub fn table(&self) -> Result<&Table, DataError> {
        if let Some(table) = self.table.get() {
            return Ok(table);
        }

        let table = load_table(&self.path)?;
        Ok(self.table.get_or_init(|| table))
    }

    /// Whether the table has already been loaded.
    #[allow(dead_code)] // Used by tests
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }
}
