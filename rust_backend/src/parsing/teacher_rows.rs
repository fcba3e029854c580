//! Per-teacher schedule construction from timetable rows.
//!
//! Each data row carries a teacher name in the identity column followed by
//! the weekday blocks of period cells. Rows whose names normalize to the same
//! teacher accumulate into one [`TeacherSchedule`].

use std::collections::BTreeMap;

use log::{debug, info};

use super::cell::parse_cell_to_class;
use super::grid::{CellValue, GridSource};
use crate::config::LayoutConfig;
use crate::core::domain::periods;
use crate::core::{DayBlock, TeacherSchedule};

/// Teacher name to weekly schedule, ordered by name.
pub type TeacherSchedules = BTreeMap<String, TeacherSchedule>;

/// Normalizes a teacher label from the identity column.
///
/// Surrounding whitespace and one trailing parenthesized annotation (such as
/// a homeroom number) are removed.
///
/// # Examples
///
/// ```
/// use timetable_checker::parsing::teacher_rows::normalize_teacher_name;
///
/// assert_eq!(normalize_teacher_name(" 김민수 (1) "), "김민수");
/// assert_eq!(normalize_teacher_name("김민수(2)"), "김민수");
/// assert_eq!(normalize_teacher_name("이(가)영"), "이(가)영");
/// ```
pub fn normalize_teacher_name(raw_name: &str) -> String {
    let name = raw_name.trim();
    strip_trailing_annotation(name).trim().to_string()
}

fn strip_trailing_annotation(name: &str) -> &str {
    let Some(inner) = name.strip_suffix(')') else {
        return name;
    };
    // The annotation cannot contain ')', so it must open after the last one.
    let search_from = inner.rfind(')').map(|i| i + 1).unwrap_or(0);
    match inner[search_from..].find('(') {
        Some(open) => &name[..search_from + open],
        None => name,
    }
}

/// Teacher name carried by an identity cell, if the row belongs to a teacher.
fn teacher_name(cell: &CellValue) -> Option<String> {
    let raw = match cell {
        CellValue::Absent => return None,
        CellValue::Text(s) => s.clone(),
        other => other.to_string(),
    };
    let name = normalize_teacher_name(&raw);
    (!name.is_empty()).then_some(name)
}

/// Scans data rows of `grid` into `schedules`.
///
/// Rows from `layout.first_data_row` to the grid's last row are read. Rows
/// without a teacher name are skipped. A teacher seen on several rows keeps a
/// single schedule: a later row overwrites a slot only where it holds a class,
/// so rows covering different slots merge.
///
/// Returns the number of rows that contributed to a schedule.
pub fn collect_teacher_rows<G: GridSource + ?Sized>(
    grid: &G,
    day_blocks: &[DayBlock],
    layout: &LayoutConfig,
    schedules: &mut TeacherSchedules,
) -> usize {
    let mut rows_read = 0;

    for row in layout.first_data_row..=grid.max_row() {
        let Some(name) = teacher_name(grid.cell_value(row, layout.teacher_column)) else {
            debug!("Skipping row {}: no teacher name", row);
            continue;
        };

        let schedule = schedules.entry(name).or_default();
        for block in day_blocks {
            for period in periods() {
                let value = grid.cell_value(row, block.column_for(period));
                if let Some(code) = parse_cell_to_class(value) {
                    schedule.set(block.day, period, Some(code));
                }
            }
        }
        rows_read += 1;
    }

    rows_read
}

/// Builds the teacher schedules of `grid` into a fresh map.
pub fn parse_teacher_rows<G: GridSource + ?Sized>(
    grid: &G,
    day_blocks: &[DayBlock],
    layout: &LayoutConfig,
) -> TeacherSchedules {
    let mut schedules = TeacherSchedules::new();
    let rows_read = collect_teacher_rows(grid, day_blocks, layout, &mut schedules);
    info!(
        "Parsed {} teacher rows into {} schedules",
        rows_read,
        schedules.len()
    );
    schedules
}
