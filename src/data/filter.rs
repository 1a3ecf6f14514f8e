use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use super::datetime::{canonical_date, parse_slot, TimeColumns};
use super::error::DataError;
use super::model::{Row, Table};

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Which positional/temporal view the user picked. Ignored while a search
/// text is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Every row on the selected date.
    #[default]
    Date,
    /// Rows on the selected date in the selected time slot.
    Slot,
    /// Rows whose timestamp falls in the hour after the reference time.
    UpcomingHour,
    /// Like `UpcomingHour`, but matched on slot labels instead of timestamps.
    UpcomingSlot,
}

impl FilterMode {
    pub const ALL: [FilterMode; 4] = [
        FilterMode::Date,
        FilterMode::Slot,
        FilterMode::UpcomingHour,
        FilterMode::UpcomingSlot,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Date => "Hele dag",
            FilterMode::Slot => "Tijdsvak",
            FilterMode::UpcomingHour => "Komend uur",
            FilterMode::UpcomingSlot => "Komend uur (tijdsvak)",
        }
    }
}

/// The filter input for one pipeline run. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: String,
    pub selected_date: NaiveDate,
    pub selected_slot: Option<String>,
    pub mode: FilterMode,
    /// Start of the window for the upcoming-hour modes.
    pub reference_time: NaiveDateTime,
}

/// A request resolved to exactly one filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query<'a> {
    Search(&'a str),
    Date(NaiveDate),
    DateSlot {
        date: NaiveDate,
        slot: Option<&'a str>,
    },
    UpcomingHour(NaiveDateTime),
    UpcomingSlot(NaiveDateTime),
}

impl FilterCriteria {
    /// Resolve the criteria to a single query. A non-empty search text wins
    /// over every other setting.
    pub fn query(&self) -> Query<'_> {
        if !self.search_text.is_empty() {
            return Query::Search(&self.search_text);
        }
        match self.mode {
            FilterMode::Date => Query::Date(self.selected_date),
            FilterMode::Slot => Query::DateSlot {
                date: self.selected_date,
                slot: self.selected_slot.as_deref(),
            },
            FilterMode::UpcomingHour => Query::UpcomingHour(self.reference_time),
            FilterMode::UpcomingSlot => Query::UpcomingSlot(self.reference_time),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return the subset of `table` selected by `criteria`, in source order.
pub fn apply(
    table: &Table,
    criteria: &FilterCriteria,
    columns: &TimeColumns,
) -> Result<Table, DataError> {
    let rows = match criteria.query() {
        Query::Search(text) => search(table, text),
        Query::Date(date) => {
            require_columns(table, columns, false)?;
            on_date(table, date)
        }
        Query::DateSlot { date, slot } => {
            let slot_idx = require_columns(table, columns, true)?;
            let day = on_date(table, date);
            match (slot_idx, slot.map(str::trim).filter(|s| !s.is_empty())) {
                (Some(idx), Some(slot)) => day
                    .into_iter()
                    .filter(|row| table.cell(row, idx).trim() == slot)
                    .collect(),
                _ => Vec::new(),
            }
        }
        Query::UpcomingHour(reference) => {
            require_time_source(table, columns)?;
            upcoming_hour(table, reference)?
        }
        Query::UpcomingSlot(reference) => {
            let slot_idx = require_columns(table, columns, true)?;
            match slot_idx {
                Some(idx) => upcoming_slot(table, idx, reference),
                None => Vec::new(),
            }
        }
    };

    log::debug!("{:?} matched {} of {} rows", criteria.query(), rows.len(), table.len());
    Ok(table.with_rows(rows))
}

/// Case-insensitive substring match over every visible column.
fn search(table: &Table, text: &str) -> Vec<Row> {
    if text.is_empty() {
        return table.rows.clone();
    }
    let needle = text.to_lowercase();
    table
        .rows
        .iter()
        .filter(|row| row.cells.iter().any(|c| c.to_lowercase().contains(&needle)))
        .cloned()
        .collect()
}

fn on_date(table: &Table, date: NaiveDate) -> Vec<Row> {
    let wanted = canonical_date(date);
    table
        .rows
        .iter()
        .filter(|row| row.normalized_date() == wanted)
        .cloned()
        .collect()
}

/// Half-open window `[reference, reference + 1h)` on the derived timestamp.
fn upcoming_hour(table: &Table, reference: NaiveDateTime) -> Result<Vec<Row>, DataError> {
    if !table.rows.iter().any(|row| row.datetime().is_some()) {
        return Err(DataError::MissingTimeColumns);
    }
    let end = reference + TimeDelta::hours(1);
    Ok(table
        .rows
        .iter()
        .filter(|row| matches!(row.datetime(), Some(dt) if dt >= reference && dt < end))
        .cloned()
        .collect())
}

/// Pick the slot `HH.00 - HH+1.00` on the reference date; failing that, the
/// first slot whose label starts with the reference hour.
fn upcoming_slot(table: &Table, slot_idx: usize, reference: NaiveDateTime) -> Vec<Row> {
    let day = on_date(table, reference.date());
    let hour = reference.hour();
    let target = format!("{:02}.00 - {:02}.00", hour, hour + 1);

    let label_of = |row: &Row| table.cell(row, slot_idx).trim().to_string();
    let chosen = if day.iter().any(|row| label_of(row) == target) {
        Some(target)
    } else {
        let prefixes = [format!("{hour:02}."), format!("{hour}.")];
        day.iter()
            .map(label_of)
            .find(|label| prefixes.iter().any(|p| label.starts_with(p.as_str())))
    };

    match chosen {
        Some(label) => day.into_iter().filter(|row| label_of(row) == label).collect(),
        None => Vec::new(),
    }
}

/// Check that the columns a date view depends on exist. Returns the slot
/// column position when `need_slot` is set.
fn require_columns(
    table: &Table,
    columns: &TimeColumns,
    need_slot: bool,
) -> Result<Option<usize>, DataError> {
    let mut missing = Vec::new();

    let has_date_source = [&columns.date, &columns.datetime]
        .into_iter()
        .flatten()
        .any(|name| table.has_column(name));
    if !has_date_source {
        missing.push(
            columns
                .date
                .clone()
                .or_else(|| columns.datetime.clone())
                .unwrap_or_else(|| "date".to_string()),
        );
    }

    let mut slot_idx = None;
    if need_slot {
        slot_idx = columns.slot.as_deref().and_then(|name| table.column_index(name));
        if slot_idx.is_none() {
            missing.push(columns.slot.clone().unwrap_or_else(|| "slot".to_string()));
        }
    }

    if missing.is_empty() {
        Ok(slot_idx)
    } else {
        Err(DataError::MissingColumns(missing))
    }
}

/// Check that a timestamp can be built: either the datetime column exists, or
/// both the date and time columns do. Names the configured columns that are
/// absent; with none configured the later per-row check reports the failure.
fn require_time_source(table: &Table, columns: &TimeColumns) -> Result<(), DataError> {
    let present = |name: &Option<String>| name.as_deref().is_some_and(|n| table.has_column(n));
    if present(&columns.datetime) || (present(&columns.date) && present(&columns.time)) {
        return Ok(());
    }

    let missing: Vec<String> = [&columns.datetime, &columns.date, &columns.time]
        .into_iter()
        .flatten()
        .filter(|name| !table.has_column(name))
        .cloned()
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::MissingColumns(missing))
    }
}

// ---------------------------------------------------------------------------
// Control values for the UI
// ---------------------------------------------------------------------------

/// Every distinct valid date in the table, ascending.
pub fn available_dates(table: &Table) -> Vec<NaiveDate> {
    table
        .rows
        .iter()
        .filter_map(Row::date)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct non-empty slot labels on `date`, ordered by start time. Labels
/// that do not parse come last, alphabetically.
pub fn slots_for_date(table: &Table, columns: &TimeColumns, date: NaiveDate) -> Vec<String> {
    let Some(idx) = columns.slot.as_deref().and_then(|n| table.column_index(n)) else {
        return Vec::new();
    };
    let labels: BTreeSet<String> = on_date(table, date)
        .iter()
        .map(|row| table.cell(row, idx).trim().to_string())
        .filter(|label| !label.is_empty())
        .collect();

    let mut labels: Vec<String> = labels.into_iter().collect();
    labels.sort_by_key(|label| {
        let start = parse_slot(label).map(|(start, _)| start);
        (start.is_none(), start)
    });
    labels
}
