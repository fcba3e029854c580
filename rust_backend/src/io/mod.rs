//! High-level timetable loading.
//!
//! Loaders pick the right [`GridSource`](crate::parsing::GridSource)
//! implementation for a file and attach the file path to any failure.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use timetable_checker::config::LayoutConfig;
//! use timetable_checker::io::TimetableLoader;
//!
//! let loaded = TimetableLoader::load_from_file(Path::new("timetable.xlsx"), &LayoutConfig::default())
//!     .expect("Failed to load");
//! println!("Read sheet {}", loaded.sheet_name);
//! ```

pub mod loaders;


pub use loaders::{LoadedTimetable, TimetableLoader, TimetableSourceType};
