use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::data::datetime::TimeColumns;
use crate::data::present::PresentOptions;
use crate::data::PipelineOptions;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Search the Top 2000 by title, artist, date and time slot.
#[derive(Parser, Debug, Default)]
#[command(version, about)]
pub struct Cli {
    /// Data file to open (overrides the config file).
    pub file: Option<PathBuf>,

    /// JSON configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Field delimiter of the data file.
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Where to remember the last used filters between runs.
    #[arg(short, long)]
    pub session: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

/// Settings for one run of the viewer. Every field has a default, so a
/// config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: PathBuf,
    pub delimiter: char,
    pub session_file: Option<PathBuf>,
    pub pipeline: PipelineOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("TOP2000-2025.csv"),
            delimiter: ';',
            session_file: None,
            pipeline: PipelineOptions {
                time_columns: TimeColumns {
                    date: Some("Datum".into()),
                    slot: Some("Tijdsvak".into()),
                    datetime: None,
                    time: None,
                },
                present: PresentOptions {
                    numeric_columns: vec!["Positie".into(), "Notering".into(), "Jaar".into()],
                    date_columns: vec!["Datum".into()],
                    rank_columns: Vec::new(),
                },
            },
        }
    }
}

impl AppConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.delimiter_byte()?;
        Ok(config)
    }

    /// Combine the optional config file with command line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(file) = &cli.file {
            config.source = file.clone();
        }
        if let Some(delimiter) = cli.delimiter {
            config.delimiter = delimiter;
        }
        if let Some(session) = &cli.session {
            config.session_file = Some(session.clone());
        }
        config.delimiter_byte()?;
        Ok(config)
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        Ok(self.delimiter as u8)
    }
}
