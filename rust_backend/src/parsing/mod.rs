//! Parsers that turn a timetable sheet into per-teacher schedules.
//!
//! # Parsers
//!
//! - [`grid`]: the [`GridSource`] contract and the in-memory grid
//! - [`xlsx`]: `.xlsx` workbook reader implementing [`GridSource`]
//! - [`layout`]: weekday block detection in the header row
//! - [`cell`]: cell text to class code normalization
//! - [`teacher_rows`]: row scanning into [`TeacherSchedules`]
//!
//! # Example
//!
//! ```no_run
//! use timetable_checker::config::LayoutConfig;
//! use timetable_checker::parsing::{detect_day_blocks, parse_teacher_rows, XlsxGrid};
//!
//! let layout = LayoutConfig::default();
//! let grid = XlsxGrid::open("timetable.xlsx", &layout.sheet_name)
//!     .expect("Failed to open workbook");
//! let blocks = detect_day_blocks(&grid, layout.header_row).expect("No weekday headers");
//! let schedules = parse_teacher_rows(&grid, &blocks, &layout);
//! println!("Parsed {} teachers", schedules.len());
//! ```

pub mod cell;
pub mod grid;
pub mod layout;
pub mod teacher_rows;
pub mod xlsx;


pub use cell::parse_cell_to_class;
pub use grid::{CellValue, GridSource, MemoryGrid};
pub use layout::detect_day_blocks;
pub use teacher_rows::{normalize_teacher_name, parse_teacher_rows, TeacherSchedules};
pub use xlsx::XlsxGrid;
