/// Data layer: loading, normalization, filtering and presentation.
///
/// Architecture:
/// ```text
///   TOP2000.csv (semicolon separated)
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Table (all text)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ datetime │  attach derived date / datetime / slot values
///   └──────────┘      (kept in `cache`, keyed by path + mtime)
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  search | date | slot | upcoming hour → row subset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ present  │  strip derived values, tidy cells, sort
///   └──────────┘
/// ```
pub mod cache;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod present;

use serde::{Deserialize, Serialize};

use self::datetime::TimeColumns;
use self::error::DataError;
use self::filter::FilterCriteria;
use self::model::Table;
use self::present::PresentOptions;

/// Everything the filter and presentation steps need besides the criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub time_columns: TimeColumns,
    pub present: PresentOptions,
}

/// Display-ready rows of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutcome {
    pub table: Table,
    pub count: usize,
}

/// Filter an already normalized table and prepare the result for display.
pub fn run_query(
    table: &Table,
    criteria: &FilterCriteria,
    options: &PipelineOptions,
) -> Result<QueryOutcome, DataError> {
    let filtered = filter::apply(table, criteria, &options.time_columns)?;
    let table = present::present(&filtered, &options.present);
    Ok(QueryOutcome {
        count: table.len(),
        table,
    })
}
