pub mod pipeline;

pub use pipeline::{check_timetable, CheckOutcome, TimetableChecker};
