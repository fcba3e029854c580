//! Weekday block detection.
//!
//! Timetable sheets lay out each weekday as a run of period columns under a
//! single header cell carrying the weekday label. The locator scans that
//! header row left to right and records where each weekday's run starts.

use log::{debug, info, warn};

use super::grid::GridSource;
use crate::core::{DayBlock, Weekday};
use crate::error::{TimetableError, TimetableResult};

/// Locates weekday blocks in `header_row` of `grid`.
///
/// Blocks come back in column order. A weekday label seen again further right
/// is ignored, the first column wins.
///
/// # Errors
///
/// `LayoutError` when the header row holds no weekday label at all.
pub fn detect_day_blocks<G: GridSource + ?Sized>(
    grid: &G,
    header_row: u32,
) -> TimetableResult<Vec<DayBlock>> {
    let mut blocks: Vec<DayBlock> = Vec::new();

    for col in 1..=grid.max_column() {
        let Some(label) = grid.cell_value(header_row, col).as_text() else {
            continue;
        };
        let Some(day) = Weekday::from_label(label.trim()) else {
            continue;
        };
        if blocks.iter().any(|b| b.day == day) {
            debug!("Ignoring repeated '{}' header at column {}", day, col);
            continue;
        }
        blocks.push(DayBlock::new(day, col));
    }

    if blocks.is_empty() {
        return Err(TimetableError::LayoutError(format!(
            "no weekday headers found in row {}",
            header_row
        )));
    }

    if blocks.len() < Weekday::ALL.len() {
        warn!(
            "Only {} of {} weekday blocks found in row {}",
            blocks.len(),
            Weekday::ALL.len(),
            header_row
        );
    }
    info!(
        "Located weekday blocks: {}",
        blocks
            .iter()
            .map(|b| format!("{}@{}", b.day, b.start_col))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::grid::MemoryGrid;

    fn header_grid(labels: &[(u32, &str)]) -> MemoryGrid {
        let mut grid = MemoryGrid::blank(3, 36);
        for (col, label) in labels {
            grid.set(2, *col, *label);
        }
        grid
    }

    #[test]
    fn test_detects_standard_layout() {
        let grid = header_grid(&[(2, "월"), (9, "화"), (16, "수"), (23, "목"), (30, "금")]);
        let blocks = detect_day_blocks(&grid, 2).unwrap();
        assert_eq!(
            blocks,
            vec![
                DayBlock::new(Weekday::Monday, 2),
                DayBlock::new(Weekday::Tuesday, 9),
                DayBlock::new(Weekday::Wednesday, 16),
                DayBlock::new(Weekday::Thursday, 23),
                DayBlock::new(Weekday::Friday, 30),
            ]
        );
    }

    #[test]
    fn test_labels_are_trimmed() {
        let grid = header_grid(&[(5, "  목 ")]);
        let blocks = detect_day_blocks(&grid, 2).unwrap();
        assert_eq!(blocks, vec![DayBlock::new(Weekday::Thursday, 5)]);
    }

    #[test]
    fn test_order_follows_columns_not_weekdays() {
        let grid = header_grid(&[(2, "금"), (9, "월")]);
        let blocks = detect_day_blocks(&grid, 2).unwrap();
        assert_eq!(blocks[0].day, Weekday::Friday);
        assert_eq!(blocks[1].day, Weekday::Monday);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let grid = header_grid(&[(2, "월"), (9, "월")]);
        let blocks = detect_day_blocks(&grid, 2).unwrap();
        assert_eq!(blocks, vec![DayBlock::new(Weekday::Monday, 2)]);
    }

    #[test]
    fn test_labels_in_other_rows_are_ignored() {
        let mut grid = MemoryGrid::blank(3, 10);
        grid.set(1, 2, "월");
        grid.set(3, 2, "화");
        let err = detect_day_blocks(&grid, 2).unwrap_err();
        assert!(matches!(err, TimetableError::LayoutError(_)));
    }

    #[test]
    fn test_no_headers_is_layout_error() {
        let grid = header_grid(&[(2, "Monday"), (3, "월요일")]);
        let err = detect_day_blocks(&grid, 2).unwrap_err();
        assert!(err.to_string().contains("no weekday headers found"));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let grid = header_grid(&[(2, "월"), (9, "화"), (16, "수")]);
        let first = detect_day_blocks(&grid, 2).unwrap();
        let second = detect_day_blocks(&grid, 2).unwrap();
        assert_eq!(first, second);
    }
}
