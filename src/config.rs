use log::LevelFilter;
use std::path::PathBuf;

pub const MIN_PRINCIPAL: u32 = 1_000;
pub const MAX_PRINCIPAL: u32 = 1_000_000;

pub const MIN_ANNUAL_RATE: f64 = 1.0;
pub const MAX_ANNUAL_RATE: f64 = 30.0;

pub const MIN_TERM_YEARS: u8 = 1;
pub const MAX_TERM_YEARS: u8 = 30;

pub const MONTHS_IN_YEAR: u32 = 12;
pub const PERCENT: f64 = 100.;

/// runtime settings for the interactive app
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub report_dir: PathBuf,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn with_report_dir(mut self, report_dir: impl Into<PathBuf>) -> Self {
        self.report_dir = report_dir.into();
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("."),
            log_level: LevelFilter::Warn,
        }
    }
}
