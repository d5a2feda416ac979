use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::formats::ReadOptions;

/// Application configuration module
/// This module handles loading and validating the settings of the command
/// line tool. Every field has a default, so a partial (or empty) JSON object
/// is a valid configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Print parser diagnostics and validate sequence numbers
    #[serde(default)]
    pub debug: bool,

    /// Overwrite existing output files
    #[serde(default)]
    pub force_overwrite: bool,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Effective log level; debug mode raises it to at least Debug, whatever
    /// `log_level` says, so every field combination is consistent
    pub fn level_filter(&self) -> LevelFilter {
        let level = LevelFilter::from(self.log_level);
        if self.debug { level.max(LevelFilter::Debug) } else { level }
    }

    // @returns: Options threaded to the SubRip parser
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions { debug: self.debug }
    }
}
