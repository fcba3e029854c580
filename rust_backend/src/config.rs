//! Checker configuration and TOML file support.
//!
//! Analysis parameters and sheet layout can be kept in a `timetable.toml`:
//!
//! ```toml
//! [analysis]
//! min_days = 3
//! consecutive_length = 4
//! target_periods = [1, 4, 5, 7]
//! check_period7 = true
//!
//! [layout]
//! header_row = 2
//! first_data_row = 4
//! teacher_column = 1
//! sheet_name = "주간시간표"
//! ```
//!
//! Every key is optional; missing ones take the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{Period, Weekday, PERIODS_PER_DAY};
use crate::error::{TimetableError, TimetableResult};

/// Parameters of the three timetable patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum number of qualifying days for the breadth patterns.
    pub min_days: usize,
    /// Length of the identical-class run looked for on a single day.
    pub consecutive_length: usize,
    /// Periods that must all be taught on a day for it to qualify.
    pub target_periods: Vec<Period>,
    /// Whether the period-7 breadth pattern runs at all.
    pub check_period7: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_days: 3,
            consecutive_length: 4,
            target_periods: vec![1, 4, 5, 7],
            check_period7: true,
        }
    }
}

impl AnalysisConfig {
    /// Checks every parameter against its allowed range.
    ///
    /// # Examples
    ///
    /// ```
    /// use timetable_checker::config::AnalysisConfig;
    ///
    /// assert!(AnalysisConfig::default().validate().is_ok());
    ///
    /// let config = AnalysisConfig { target_periods: vec![], ..AnalysisConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> TimetableResult<()> {
        let days = Weekday::ALL.len();
        if !(1..=days).contains(&self.min_days) {
            return Err(TimetableError::ConfigurationError(format!(
                "min_days must be between 1 and {}, got {}",
                days, self.min_days
            )));
        }

        let periods = usize::from(PERIODS_PER_DAY);
        if !(1..=periods).contains(&self.consecutive_length) {
            return Err(TimetableError::ConfigurationError(format!(
                "consecutive_length must be between 1 and {}, got {}",
                periods, self.consecutive_length
            )));
        }

        if self.target_periods.is_empty() {
            return Err(TimetableError::ConfigurationError(
                "target_periods must name at least one period".to_string(),
            ));
        }
        if let Some(bad) = self
            .target_periods
            .iter()
            .find(|p| !(1..=PERIODS_PER_DAY).contains(*p))
        {
            return Err(TimetableError::ConfigurationError(format!(
                "target_periods entries must be between 1 and {}, got {}",
                PERIODS_PER_DAY, bad
            )));
        }

        Ok(())
    }
}

/// Where the timetable sits inside the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Row holding the weekday labels.
    pub header_row: u32,
    /// First row holding a teacher.
    pub first_data_row: u32,
    /// Column holding the teacher name.
    pub teacher_column: u32,
    /// Worksheet to read when the workbook has it; otherwise the first sheet.
    pub sheet_name: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_row: 2,
            first_data_row: 4,
            teacher_column: 1,
            sheet_name: "주간시간표".to_string(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> TimetableResult<()> {
        if self.header_row == 0 || self.first_data_row == 0 || self.teacher_column == 0 {
            return Err(TimetableError::ConfigurationError(
                "layout rows and columns are 1-indexed and must be at least 1".to_string(),
            ));
        }
        if self.first_data_row <= self.header_row {
            return Err(TimetableError::ConfigurationError(format!(
                "first_data_row ({}) must come after header_row ({})",
                self.first_data_row, self.header_row
            )));
        }
        Ok(())
    }
}

/// Full checker configuration as stored in `timetable.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub analysis: AnalysisConfig,
    pub layout: LayoutConfig,
}

impl CheckerConfig {
    /// Parses a configuration from TOML text.
    ///
    /// Errors name the offending key path, e.g. `analysis.min_days`.
    pub fn from_toml_str(content: &str) -> TimetableResult<Self> {
        let deserializer = toml::Deserializer::new(content);
        serde_path_to_error::deserialize(deserializer).map_err(|e| {
            TimetableError::ConfigurationError(format!(
                "Failed to parse config at '{}': {}",
                e.path(),
                e.inner()
            ))
        })
    }

    /// Loads a configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TimetableResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            TimetableError::ConfigurationError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads `timetable.toml` from the first standard location that has one.
    ///
    /// Searches the current directory, `rust_backend/` and the parent
    /// directory. Returns `Ok(None)` when none exists.
    pub fn from_default_location() -> TimetableResult<Option<Self>> {
        let search_paths = [
            PathBuf::from("timetable.toml"),
            PathBuf::from("rust_backend/timetable.toml"),
            PathBuf::from("../timetable.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                log::info!("Using configuration from {}", path.display());
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    pub fn validate(&self) -> TimetableResult<()> {
        self.layout.validate()?;
        self.analysis.validate()
    }
}
