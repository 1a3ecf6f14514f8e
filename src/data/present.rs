use serde::{Deserialize, Serialize};

use super::datetime::{canonical_date, parse_date};
use super::model::{Row, Table};

/// Which columns get display fixes after filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentOptions {
    /// Columns that lose a trailing `.0` (e.g. `Positie`, `Jaar`).
    pub numeric_columns: Vec<String>,
    /// Columns re-rendered as `DD-MM-YYYY`.
    pub date_columns: Vec<String>,
    /// Rank columns to sort by when no row carries a time. The first one
    /// present in the table is used; empty keeps source order.
    pub rank_columns: Vec<String>,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Turn a filtered table into display rows.
///
/// Cleans numeric and date columns, sorts by derived time (null last, stable),
/// and drops every derived value. Running it on its own output changes
/// nothing.
pub fn present(table: &Table, options: &PresentOptions) -> Table {
    let numeric = resolve(table, &options.numeric_columns);
    let dates = resolve(table, &options.date_columns);

    let mut rows = table.rows.clone();
    for row in &mut rows {
        for &idx in &numeric {
            if let Some(cell) = row.cells.get_mut(idx) {
                if let Some(stripped) = cell.strip_suffix(".0") {
                    *cell = stripped.to_string();
                }
            }
        }
        for &idx in &dates {
            if let Some(cell) = row.cells.get_mut(idx) {
                if let Some(date) = parse_date(cell) {
                    *cell = canonical_date(date);
                }
            }
        }
    }

    sort_rows(&mut rows, table, options);

    for row in &mut rows {
        row.derived = None;
    }
    table.with_rows(rows)
}

fn sort_rows(rows: &mut [Row], table: &Table, options: &PresentOptions) {
    if rows.iter().any(|r| r.datetime().is_some()) {
        rows.sort_by_key(|r| {
            let key = r.datetime();
            (key.is_none(), key)
        });
    } else if rows.iter().any(|r| r.slot_start().is_some()) {
        rows.sort_by_key(|r| {
            let key = r.slot_start();
            (key.is_none(), key)
        });
    } else if let Some(idx) = options
        .rank_columns
        .iter()
        .find_map(|name| table.column_index(name))
    {
        rows.sort_by_key(|r| {
            let rank = r
                .cells
                .get(idx)
                .and_then(|c| c.trim().parse::<i64>().ok());
            (rank.is_none(), rank)
        });
    }
}

fn resolve(table: &Table, names: &[String]) -> Vec<usize> {
    names.iter().filter_map(|n| table.column_index(n)).collect()
}
