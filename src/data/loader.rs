use std::path::Path;

use super::error::DataError;
use super::model::{Row, Table};

/// Mojibake left behind when a UTF-8 byte-order mark is read as Latin-1.
const BOM_ARTIFACT: &str = "\u{00ef}\u{00bb}\u{00bf}";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a delimiter-separated text file into a [`Table`].
///
/// * The first record is the header.
/// * Every cell is kept as text; missing cells become `""`.
/// * Records longer than the header are truncated to its width.
/// * Invalid UTF-8 is decoded lossily instead of failing the load.
pub fn load_table(path: &Path, delimiter: u8) -> Result<Table, DataError> {
    if !path.is_file() {
        return Err(DataError::SourceNotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let columns: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| clean_header(&String::from_utf8_lossy(h)))
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    for result in reader.byte_records() {
        let record = result?;
        let mut cells: Vec<String> = record
            .iter()
            .take(width)
            .map(|cell| String::from_utf8_lossy(cell).into_owned())
            .collect();
        cells.resize(width, String::new());
        rows.push(Row::new(cells));
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        rows.len(),
        columns,
        path.display()
    );
    Ok(Table::new(columns, rows))
}

/// Strip whitespace and any byte-order-mark residue from a column name.
pub fn clean_header(raw: &str) -> String {
    raw.replace('\u{feff}', "")
        .replace(BOM_ARTIFACT, "")
        .trim()
        .to_string()
}
