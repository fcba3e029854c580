//! Error types for timetable checking.

/// Result type for timetable operations
pub type TimetableResult<T> = Result<T, TimetableError>;

/// Error type for timetable operations.
///
/// `LayoutError` and `ConfigurationError` are structural: they abort the whole
/// run before any finding is produced. Individual malformed cells never surface
/// here, they degrade to "no class".
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    #[error("Layout error: {0}")]
    LayoutError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Workbook error: {0}")]
    WorkbookError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TimetableError {
    /// True for errors caused by the shape of the input sheet or the analysis
    /// parameters rather than by file access.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TimetableError::LayoutError(_) | TimetableError::ConfigurationError(_)
        )
    }
}

impl From<zip::result::ZipError> for TimetableError {
    fn from(e: zip::result::ZipError) -> Self {
        TimetableError::WorkbookError(format!("Failed to read workbook archive: {}", e))
    }
}

impl From<quick_xml::Error> for TimetableError {
    fn from(e: quick_xml::Error) -> Self {
        TimetableError::WorkbookError(format!("Malformed workbook XML: {}", e))
    }
}
