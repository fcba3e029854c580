use anyhow::{Context, Result};
use log::info;
use std::collections::BTreeMap;
use std::path::Path;

use crate::algorithms::{analyze_patterns, PatternReport, TeacherSummary};
use crate::config::CheckerConfig;
use crate::core::DayBlock;
use crate::error::TimetableResult;
use crate::io::TimetableLoader;
use crate::parsing::{detect_day_blocks, parse_teacher_rows, GridSource, TeacherSchedules};

/// Result of checking one timetable sheet
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    /// Worksheet the grid came from, when it was read from a workbook.
    pub sheet_name: Option<String>,
    pub day_blocks: Vec<DayBlock>,
    pub schedules: TeacherSchedules,
    pub report: PatternReport,
}

impl CheckOutcome {
    /// Rendered messages per flagged teacher.
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.report.messages()
    }

    /// Structured summary for every teacher.
    pub fn summaries(&self) -> &BTreeMap<String, TeacherSummary> {
        &self.report.summaries
    }

    pub fn has_findings(&self) -> bool {
        !self.report.findings.is_empty()
    }
}

/// Main check pipeline: validate, locate day blocks, build grids, analyze
pub struct TimetableChecker {
    config: CheckerConfig,
}

impl TimetableChecker {
    /// Create a checker with default configuration
    pub fn new() -> Self {
        Self {
            config: CheckerConfig::default(),
        }
    }

    /// Create a checker with custom configuration
    pub fn with_config(config: CheckerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check an already-loaded grid.
    ///
    /// Configuration is validated before the header row is read, so a bad
    /// configuration never produces partial results.
    pub fn check_grid<G: GridSource + ?Sized>(&self, grid: &G) -> TimetableResult<CheckOutcome> {
        // Step 1: Reject bad parameters up front
        self.config.validate()?;

        // Step 2: Locate weekday blocks
        let layout = &self.config.layout;
        let day_blocks = detect_day_blocks(grid, layout.header_row)?;

        // Step 3: Build teacher schedules
        let schedules = parse_teacher_rows(grid, &day_blocks, layout);

        // Step 4: Analyze
        let report = analyze_patterns(&schedules, &self.config.analysis)?;

        Ok(CheckOutcome {
            sheet_name: None,
            day_blocks,
            schedules,
            report,
        })
    }

    /// Load a workbook from disk and check it
    pub fn check_file(&self, path: &Path) -> Result<CheckOutcome> {
        self.config
            .validate()
            .context("Invalid checker configuration")?;

        let loaded = TimetableLoader::load_from_file(path, &self.config.layout)?;
        let mut outcome = self
            .check_grid(&loaded.grid)
            .with_context(|| format!("Failed to check {}", path.display()))?;
        outcome.sheet_name = Some(loaded.sheet_name);

        info!(
            "Checked {}: {} teachers, {} findings",
            path.display(),
            outcome.schedules.len(),
            outcome.report.finding_count()
        );
        Ok(outcome)
    }
}

impl Default for TimetableChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience function to check a timetable file
pub fn check_timetable(path: &Path, config: CheckerConfig) -> Result<CheckOutcome> {
    TimetableChecker::with_config(config).check_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::error::TimetableError;
    use crate::parsing::MemoryGrid;

    fn header_grid() -> MemoryGrid {
        let mut grid = MemoryGrid::blank(4, 36);
        for (i, label) in ["월", "화", "수", "목", "금"].iter().enumerate() {
            grid.set(2, 2 + 7 * i as u32, *label);
        }
        grid
    }

    #[test]
    fn test_check_grid_without_teachers() {
        let outcome = TimetableChecker::new().check_grid(&header_grid()).unwrap();
        assert_eq!(outcome.day_blocks.len(), 5);
        assert!(outcome.schedules.is_empty());
        assert!(!outcome.has_findings());
        assert!(outcome.sheet_name.is_none());
    }

    #[test]
    fn test_configuration_checked_before_layout() {
        let config = CheckerConfig {
            analysis: AnalysisConfig {
                min_days: 0,
                ..AnalysisConfig::default()
            },
            ..CheckerConfig::default()
        };
        // The grid has no headers at all; the configuration error must win.
        let err = TimetableChecker::with_config(config)
            .check_grid(&MemoryGrid::blank(4, 4))
            .unwrap_err();
        assert!(matches!(err, TimetableError::ConfigurationError(_)));
    }

    #[test]
    fn test_missing_headers_is_layout_error() {
        let err = TimetableChecker::new()
            .check_grid(&MemoryGrid::blank(4, 36))
            .unwrap_err();
        assert!(matches!(err, TimetableError::LayoutError(_)));
    }

    #[test]
    fn test_check_file_rejects_bad_config_before_reading() {
        let config = CheckerConfig {
            analysis: AnalysisConfig {
                target_periods: vec![],
                ..AnalysisConfig::default()
            },
            ..CheckerConfig::default()
        };
        let err = TimetableChecker::with_config(config)
            .check_file(Path::new("/nonexistent/timetable.xlsx"))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid checker configuration"));
    }
}
