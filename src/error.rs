use thiserror::Error;

/// Errors raised at the crate's fallible edges (files, settings, parsing
/// host-supplied names). The layout computation itself never fails.
#[derive(Error, Debug)]
pub enum GanttError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV is missing required columns (found: {0})")]
    MissingColumns(String),

    #[error("no tasks found in {0}")]
    EmptySheet(String),

    #[error("unknown view mode: {0}")]
    UnknownViewMode(String),
}

pub type Result<T> = std::result::Result<T, GanttError>;
