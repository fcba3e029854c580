//! Built-in sample timetable used by `timetable-check self-test`.

use anyhow::{ensure, Result};
use log::info;

use crate::core::{Weekday, PERIODS_PER_DAY};
use crate::parsing::{GridSource, MemoryGrid};
use crate::preprocessing::{CheckOutcome, TimetableChecker};
use crate::services::report::format_report;

/// Teacher name as written in the sample sheet.
pub const SAMPLE_TEACHER: &str = "홍길동(1)";

fn block_start(day: Weekday) -> u32 {
    let index = Weekday::ALL.iter().position(|d| *d == day).unwrap_or_default() as u32;
    2 + index * u32::from(PERIODS_PER_DAY)
}

/// Sample sheet in the default layout with one teacher row.
///
/// - Wednesday periods 1-4 hold class 101
/// - Monday, Wednesday and Friday have periods 1, 4, 5 and 7 taught; slots
///   still free get class 203
/// - Tuesday, Thursday and Friday period 7 hold class 305
pub fn build_sample_grid() -> MemoryGrid {
    let mut grid = MemoryGrid::blank(6, 36);
    grid.set(1, 1, "제목");

    for day in Weekday::ALL {
        let start = block_start(day);
        grid.set(2, start, day.label());
        for period in 1..=PERIODS_PER_DAY {
            grid.set(3, start + u32::from(period) - 1, f64::from(period));
        }
    }

    let row = 4;
    grid.set(row, 1, SAMPLE_TEACHER);

    let wednesday = block_start(Weekday::Wednesday);
    for period in 0..4 {
        grid.set(row, wednesday + period, "101\n국어");
    }

    for day in [Weekday::Monday, Weekday::Wednesday, Weekday::Friday] {
        for period in [1u32, 4, 5, 7] {
            let col = block_start(day) + period - 1;
            if grid.cell_value(row, col).is_absent() {
                grid.set(row, col, "203\n수학");
            }
        }
    }

    for day in [Weekday::Tuesday, Weekday::Thursday, Weekday::Friday] {
        grid.set(row, block_start(day) + 6, "305_x000D_\n영어");
    }

    grid
}

/// Runs the sample sheet through the default pipeline and checks the
/// expected findings.
pub fn run_self_test() -> Result<CheckOutcome> {
    let grid = build_sample_grid();
    let outcome = TimetableChecker::new().check_grid(&grid)?;
    let report = format_report(&outcome.messages());

    ensure!(report.contains("홍길동"), "teacher missing from report");
    ensure!(
        report.contains("수요일에 1~4교시 연속"),
        "consecutive-class finding missing"
    );
    ensure!(report.contains("(1,4,5,7)교시에"), "target-period finding missing");
    ensure!(report.contains("7교시에 수업"), "period-7 finding missing");

    let summary = outcome
        .summaries()
        .get("홍길동")
        .ok_or_else(|| anyhow::anyhow!("summary for 홍길동 missing"))?;
    ensure!(!summary.pattern_a.is_empty(), "pattern A summary missing");
    ensure!(summary.pattern_b.triggered, "pattern B not triggered");
    ensure!(summary.pattern_c.triggered, "pattern C not triggered");

    info!("Self-test passed");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassCode;

    #[test]
    fn test_self_test_passes() {
        run_self_test().unwrap();
    }

    #[test]
    fn test_sample_schedule() {
        let outcome = run_self_test().unwrap();
        let schedule = &outcome.schedules["홍길동"];

        let code = |s: &str| Some(ClassCode::new(s));
        assert_eq!(schedule.get(Weekday::Wednesday, 1).cloned(), code("101"));
        assert_eq!(schedule.get(Weekday::Wednesday, 5).cloned(), code("203"));
        assert_eq!(schedule.get(Weekday::Friday, 7).cloned(), code("305"));
        assert_eq!(schedule.get(Weekday::Tuesday, 1), None);
        assert_eq!(schedule.occupied_count(), 4 + 2 + 4 + 4 + 2);
    }
}
