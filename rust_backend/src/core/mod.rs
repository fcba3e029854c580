//! Core domain models for weekly timetables.
//!
//! This module defines the fundamental data structures shared by the parsers
//! and the pattern analyzer: weekdays, periods, day blocks, class codes and
//! the per-teacher schedule grid.

pub mod domain;

pub use domain::{ClassCode, DayBlock, Period, TeacherSchedule, Weekday, PERIODS_PER_DAY};
