use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::data::cache::TableCache;
use crate::data::filter::{available_dates, slots_for_date, FilterCriteria, FilterMode};
use crate::data::model::Table;
use crate::data::{run_query, QueryOutcome};

// ---------------------------------------------------------------------------
// User session – the remembered filter inputs
// ---------------------------------------------------------------------------

/// What the user last entered. Owned by the UI and handed to the pipeline
/// as a [`FilterCriteria`] on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSession {
    pub search_text: String,
    pub selected_date: Option<NaiveDate>,
    pub selected_slot: Option<String>,
    pub mode: FilterMode,
    /// Reference time for the upcoming-hour views; `None` means "now".
    pub reference_time: Option<NaiveTime>,
}

impl UserSession {
    /// Back to defaults: no search, earliest date, no slot.
    pub fn reset(&mut self, dates: &[NaiveDate]) {
        *self = Self {
            selected_date: dates.first().copied(),
            ..Self::default()
        };
    }

    /// Build the criteria for one run. `now` fills in a missing date or time.
    pub fn criteria(&self, now: NaiveDateTime) -> FilterCriteria {
        let date = self.selected_date.unwrap_or(now.date());
        FilterCriteria {
            search_text: self.search_text.trim().to_string(),
            selected_date: date,
            selected_slot: self.selected_slot.clone(),
            mode: self.mode,
            reference_time: date.and_time(self.reference_time.unwrap_or(now.time())),
        }
    }

    /// Read a saved session. A missing or unreadable file gives defaults.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Ignoring saved session: {e:#}");
                Self::default()
            }
        }
    }

    fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading session file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing session file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serializing session")?;
        std::fs::write(path, text)
            .with_context(|| format!("writing session file {}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Normalized source table, reloaded when the file changes.
    pub cache: TableCache,

    /// Current table (None until a file loaded successfully).
    pub table: Option<Arc<Table>>,

    pub session: UserSession,

    /// Distinct dates in the table, ascending.
    pub dates: Vec<NaiveDate>,

    /// Slot labels available on the selected date.
    pub slots: Vec<String>,

    /// Result of the last pipeline run.
    pub outcome: QueryOutcome,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Clock time of the last pipeline run.
    pub last_run: Option<NaiveDateTime>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let session = config
            .session_file
            .as_deref()
            .map(UserSession::load_or_default)
            .unwrap_or_default();

        let mut state = Self {
            config,
            cache: TableCache::default(),
            table: None,
            session,
            dates: Vec::new(),
            slots: Vec::new(),
            outcome: QueryOutcome::default(),
            status_message: None,
            last_run: None,
        };
        state.reload();
        state
    }

    pub fn source(&self) -> &Path {
        &self.config.source
    }

    /// Switch to another data file and show its first date.
    pub fn open(&mut self, path: PathBuf) {
        self.config.source = path;
        self.cache.invalidate();
        self.session.reset(&[]);
        self.reload();
        self.save_session();
    }

    /// Fetch the table (from cache when unchanged) and re-run the pipeline.
    /// An unset date falls back to the earliest one in the table.
    pub fn reload(&mut self) {
        self.reload_at(chrono::Local::now().naive_local());
    }

    fn reload_at(&mut self, now: NaiveDateTime) {
        let delimiter = match self.config.delimiter_byte() {
            Ok(d) => d,
            Err(e) => return self.fail(format!("{e:#}")),
        };
        match self
            .cache
            .get_or_load(&self.config.source, delimiter, &self.config.pipeline.time_columns)
        {
            Ok(table) => {
                self.dates = available_dates(&table);
                self.table = Some(table);
                if self.session.selected_date.is_none() {
                    self.session.selected_date = self.dates.first().copied();
                }
                self.refresh_at(now);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.config.source.display());
                self.table = None;
                self.dates.clear();
                self.slots.clear();
                self.outcome = QueryOutcome::default();
                self.status_message = Some(format!("Error: {e}"));
                self.last_run = Some(now);
            }
        }
    }

    /// Re-run filter and presentation for the current session.
    pub fn refresh(&mut self) {
        self.refresh_at(chrono::Local::now().naive_local());
    }

    pub fn refresh_at(&mut self, now: NaiveDateTime) {
        let Some(table) = self.table.clone() else {
            return;
        };
        self.last_run = Some(now);
        let criteria = self.session.criteria(now);
        self.slots = slots_for_date(&table, &self.config.pipeline.time_columns, criteria.selected_date);

        match run_query(&table, &criteria, &self.config.pipeline) {
            Ok(outcome) => {
                log::debug!("{} rows to display", outcome.count);
                self.outcome = outcome;
                self.status_message = None;
            }
            Err(e) => self.fail(format!("{e}")),
        }
    }

    /// Re-check the source file and re-run once the clock passes a minute
    /// boundary, so "now" based views keep moving.
    pub fn tick(&mut self, now: NaiveDateTime) {
        let minute = |t: NaiveDateTime| (t.date(), t.hour(), t.minute());
        let stale = self.last_run.map_or(true, |last| minute(last) != minute(now));
        if stale {
            self.reload_at(now);
        }
    }

    /// Clear every remembered filter and reload the file from disk.
    pub fn reset(&mut self) {
        log::info!("Resetting filters");
        self.cache.invalidate();
        self.session.reset(&[]);
        self.reload();
        self.save_session();
    }

    /// Re-run for edited filter inputs and remember them on disk.
    pub fn session_changed(&mut self) {
        self.refresh();
        self.save_session();
    }

    /// Persist the session if a session file is configured.
    pub fn save_session(&self) {
        if let Some(path) = &self.config.session_file {
            if let Err(e) = self.session.save(path) {
                log::warn!("{e:#}");
            }
        }
    }

    fn fail(&mut self, message: String) {
        log::warn!("{message}");
        self.outcome = QueryOutcome::default();
        self.status_message = Some(message);
    }
}
