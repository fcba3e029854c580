use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

use crate::config::LayoutConfig;
use crate::parsing::XlsxGrid;

/// Workbook formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimetableSourceType {
    Xlsx,
    Xlsm,
}

impl TimetableSourceType {
    /// Detects the format from a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            _ => None,
        }
    }
}

/// A timetable sheet read from disk.
#[derive(Debug)]
pub struct LoadedTimetable {
    pub grid: XlsxGrid,
    pub sheet_name: String,
}

/// Unified interface for loading timetable workbooks
pub struct TimetableLoader;

impl TimetableLoader {
    /// Load a timetable from a file (format detected from the extension)
    pub fn load_from_file(path: &Path, layout: &LayoutConfig) -> Result<LoadedTimetable> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .context("File has no extension")?;

        let source_type = TimetableSourceType::from_extension(extension)
            .with_context(|| format!("Unsupported file format: {}", extension))?;

        debug!("Reading {} as {:?}", path.display(), source_type);

        Self::load_workbook(path, layout)
    }

    /// Load a timetable from an `.xlsx`/`.xlsm` workbook
    pub fn load_workbook(path: &Path, layout: &LayoutConfig) -> Result<LoadedTimetable> {
        let grid = XlsxGrid::open(path, &layout.sheet_name)
            .with_context(|| format!("Failed to read workbook {}", path.display()))?;
        let sheet_name = grid.sheet_name().to_string();

        info!("Loaded {} (sheet '{}')", path.display(), sheet_name);

        Ok(LoadedTimetable { grid, sheet_name })
    }
}
