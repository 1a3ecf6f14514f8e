use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::datetime::{normalize, TimeColumns};
use super::error::DataError;
use super::loader::load_table;
use super::model::Table;

// ---------------------------------------------------------------------------
// Table cache
// ---------------------------------------------------------------------------

/// Keeps the normalized table of the last loaded file.
///
/// The entry is keyed by path and modification time: touching the file on
/// disk forces a reload on the next lookup. Tables are shared behind an
/// `Arc` and replaced wholesale, never mutated.
#[derive(Debug, Default)]
pub struct TableCache {
    entry: Option<CacheEntry>,
}

#[derive(Debug)]
struct CacheEntry {
    path: PathBuf,
    modified: Option<SystemTime>,
    delimiter: u8,
    columns: TimeColumns,
    table: Arc<Table>,
}

impl TableCache {
    /// Return the normalized table for `path`, loading it when the cache is
    /// empty, stale, or was built with other settings.
    pub fn get_or_load(
        &mut self,
        path: &Path,
        delimiter: u8,
        columns: &TimeColumns,
    ) -> Result<Arc<Table>, DataError> {
        let modified = modified_time(path);

        if let Some(entry) = &self.entry {
            if entry.path == path
                && entry.modified == modified
                && entry.delimiter == delimiter
                && entry.columns == *columns
            {
                log::debug!("Cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
        }

        let raw = load_table(path, delimiter)?;
        let table = Arc::new(normalize(&raw, columns));
        self.entry = Some(CacheEntry {
            path: path.to_path_buf(),
            modified,
            delimiter,
            columns: columns.clone(),
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Forget the cached table; the next lookup reloads from disk.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::info!("Table cache invalidated");
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entry.is_none()
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn columns() -> TimeColumns {
        TimeColumns {
            date: Some("Datum".into()),
            slot: Some("Tijdsvak".into()),
            ..Default::default()
        }
    }

    fn csv_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "Titel;Datum;Tijdsvak").unwrap();
        writeln!(file, "Imagine;25-12-2025;20.00 - 21.00").unwrap();
        file
    }

    #[test]
    fn second_lookup_reuses_the_table() {
        let file = csv_file();
        let mut cache = TableCache::default();
        let first = cache.get_or_load(file.path(), b';', &columns()).unwrap();
        let second = cache.get_or_load(file.path(), b';', &columns()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.has_derived());
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = csv_file();
        let mut cache = TableCache::default();
        let first = cache.get_or_load(file.path(), b';', &columns()).unwrap();
        cache.invalidate();
        assert!(cache.is_empty());
        let second = cache.get_or_load(file.path(), b';', &columns()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn changed_settings_force_reload() {
        let file = csv_file();
        let mut cache = TableCache::default();
        let first = cache.get_or_load(file.path(), b';', &columns()).unwrap();
        let second = cache
            .get_or_load(file.path(), b';', &TimeColumns::default())
            .unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.rows[0].normalized_date(), "");
    }

    #[test]
    fn missing_file_is_reported() {
        let mut cache = TableCache::default();
        let err = cache
            .get_or_load(Path::new("/definitely/not/here.csv"), b';', &columns())
            .unwrap_err();
        assert!(matches!(err, DataError::SourceNotFound(_)));
        assert!(cache.is_empty());
    }
}
