//! Domain errors.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce the OKR table from its source file.
///
/// This is the only error the dashboard surfaces to the user. It is caught
/// once at the entry point and replaces the whole dashboard with a blocking
/// message.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("data unavailable at {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },
}

impl DataError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DataError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Path of the source that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            DataError::DataUnavailable { path, .. } => path,
        }
    }

    /// Blocking message shown to the user in place of the dashboard.
    pub fn user_message(&self) -> String {
        format!(
            "Error loading data. Please ensure '{}' is in the same directory.",
            self.path().display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err = DataError::unavailable("index_goals.csv", "file not found");
        assert_eq!(
            err.to_string(),
            "data unavailable at index_goals.csv: file not found"
        );
    }

    #[test]
    fn test_user_message_names_file() {
        let err = DataError::unavailable("data/okrs.csv", "missing required column 'status'");
        assert_eq!(
            err.user_message(),
            "Error loading data. Please ensure 'data/okrs.csv' is in the same directory."
        );
    }
}
