//! Output side of the checker: report rendering and the built-in self-test.

pub mod report;
pub mod self_test;

pub use report::{format_report, summary_json, write_json_output, write_text_output};
pub use self_test::{build_sample_grid, run_self_test};
