//! Timetable pattern analysis.
//!
//! - [`patterns`]: the consecutive-class, target-period and period-7 rules
//!
//! # Example
//!
//! ```
//! use timetable_checker::algorithms::analyze_patterns;
//! use timetable_checker::config::AnalysisConfig;
//! use timetable_checker::parsing::TeacherSchedules;
//!
//! let report = analyze_patterns(&TeacherSchedules::new(), &AnalysisConfig::default()).unwrap();
//! assert_eq!(report.finding_count(), 0);
//! ```

pub mod patterns;


pub use patterns::{
    analyze_patterns, analyze_teacher, ConsecutiveRun, DayBreadth, Finding, FindingDetail,
    PatternKind, PatternReport, TeacherSummary,
};
