//! Timetable checker: finds structural patterns in school timetable sheets.
//!
//! The pipeline reads a weekly timetable grid (weekday blocks of 7 period
//! columns, one row per teacher), normalizes every cell to a class code and
//! reports three patterns per teacher:
//!
//! - the same class taught for several consecutive periods on one day
//! - a set of target periods all taught on many days
//! - period 7 taught on many days
//!
//! # Example
//!
//! ```
//! use timetable_checker::preprocessing::TimetableChecker;
//! use timetable_checker::services::{build_sample_grid, format_report};
//!
//! let outcome = TimetableChecker::new().check_grid(&build_sample_grid()).unwrap();
//! let report = format_report(&outcome.messages());
//! assert!(report.contains("홍길동 선생님"));
//! ```

pub mod algorithms;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod preprocessing;
pub mod services;

pub use config::{AnalysisConfig, CheckerConfig, LayoutConfig};
pub use error::{TimetableError, TimetableResult};
