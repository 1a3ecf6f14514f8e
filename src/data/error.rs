use std::path::PathBuf;

use thiserror::Error;

/// Failures that halt a pipeline run (or a single filter mode).
///
/// Cell-level parse problems are never reported here: an unparseable date or
/// time slot degrades to `None` on that row and the run continues.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("missing column(s) for this view: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error(
        "no row has a valid date and time; configure a datetime column or a date and time column"
    )]
    MissingTimeColumns,

    #[error("{0}")]
    Csv(#[from] csv::Error),
}
