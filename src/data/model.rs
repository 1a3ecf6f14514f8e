use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// ---------------------------------------------------------------------------
// Derived – typed values computed from the text cells of one row
// ---------------------------------------------------------------------------

/// Values derived from the date/time columns of a row.
///
/// These are layered on top of the raw text and never replace it. They are
/// not part of the schema the user sees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Derived {
    /// Canonical `DD-MM-YYYY` form of the row's date, or empty if unparseable.
    pub normalized_date: String,
    /// Combined date and time point.
    pub datetime: Option<NaiveDateTime>,
    /// Start of the row's time slot.
    pub slot_start: Option<NaiveTime>,
}

// ---------------------------------------------------------------------------
// Row – one line of the source file
// ---------------------------------------------------------------------------

/// A single row. `cells` is aligned with [`Table::columns`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub cells: Vec<String>,
    /// `None` until the row is normalized, and again after presentation.
    pub derived: Option<Derived>,
}

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self {
            cells,
            derived: None,
        }
    }

    pub fn normalized_date(&self) -> &str {
        self.derived
            .as_ref()
            .map(|d| d.normalized_date.as_str())
            .unwrap_or("")
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        self.derived.as_ref().and_then(|d| d.datetime)
    }

    pub fn slot_start(&self) -> Option<NaiveTime> {
        self.derived.as_ref().and_then(|d| d.slot_start)
    }

    /// The calendar date behind `normalized_date`, if any.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.normalized_date(), "%d-%m-%Y").ok()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An ordered set of rows sharing one column schema. Every cell is text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Build a table from string literals. Short rows are padded with `""`.
    #[cfg(test)]
    pub fn from_records<S: AsRef<str>>(columns: &[S], records: &[Vec<S>]) -> Self {
        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        let width = columns.len();
        let rows = records
            .iter()
            .map(|rec| {
                let mut cells: Vec<String> =
                    rec.iter().take(width).map(|c| c.as_ref().to_string()).collect();
                cells.resize(width, String::new());
                Row::new(cells)
            })
            .collect();
        Self { columns, rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched case-insensitively on trimmed names.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.columns
            .iter()
            .position(|c| c.trim().eq_ignore_ascii_case(wanted))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Text of `row` in column `idx`; `""` when absent.
    pub fn cell<'a>(&self, row: &'a Row, idx: usize) -> &'a str {
        row.cells.get(idx).map(String::as_str).unwrap_or("")
    }

    /// A new table with the same schema holding `rows`.
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Whether any row still carries derived values.
    #[cfg(test)]
    pub fn has_derived(&self) -> bool {
        self.rows.iter().any(|r| r.derived.is_some())
    }
}
