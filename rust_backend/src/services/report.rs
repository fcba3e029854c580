//! Text and JSON rendering of check results.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::algorithms::TeacherSummary;

/// Line printed when no teacher triggered any pattern.
pub const NO_FINDINGS: &str = "문제 패턴이 발견되지 않았습니다.";

#[derive(Serialize)]
struct SummaryDocument<'a> {
    teachers: &'a BTreeMap<String, TeacherSummary>,
}

/// Plain-text listing of findings, one heading per teacher in name order.
pub fn format_report(messages: &BTreeMap<String, Vec<String>>) -> String {
    if messages.is_empty() {
        return NO_FINDINGS.to_string();
    }

    let mut lines = Vec::new();
    for (teacher, teacher_messages) in messages {
        lines.push(format!("=== {} 선생님 ===", teacher));
        lines.extend(teacher_messages.iter().map(|m| format!("- {}", m)));
    }
    lines.join("\n")
}

/// Pretty-printed `{"teachers": {...}}` document.
pub fn summary_json(summaries: &BTreeMap<String, TeacherSummary>) -> Result<String> {
    serde_json::to_string_pretty(&SummaryDocument {
        teachers: summaries,
    })
    .context("Failed to serialize summary")
}

/// Writes the text report to `path`, or to stdout when no path is given.
pub fn write_text_output(text: &str, path: Option<&Path>) -> Result<()> {
    write_output(text, path)
}

/// Writes the JSON summary to `path`, or to stdout when no path is given.
pub fn write_json_output(summaries: &BTreeMap<String, TeacherSummary>, path: Option<&Path>) -> Result<()> {
    let json = summary_json(summaries)?;
    write_output(&json, path)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", content).context("Failed to write to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{ConsecutiveRun, DayBreadth};
    use crate::core::{ClassCode, Weekday};
    use tempfile::TempDir;

    #[test]
    fn test_empty_report() {
        assert_eq!(format_report(&BTreeMap::new()), NO_FINDINGS);
    }

    #[test]
    fn test_report_sorted_by_teacher() {
        let mut messages = BTreeMap::new();
        messages.insert("홍길동".to_string(), vec!["b1".to_string(), "b2".to_string()]);
        messages.insert("김민수".to_string(), vec!["a1".to_string()]);

        assert_eq!(
            format_report(&messages),
            "=== 김민수 선생님 ===\n- a1\n=== 홍길동 선생님 ===\n- b1\n- b2"
        );
    }

    #[test]
    fn test_summary_json_keeps_korean() {
        let mut summaries = BTreeMap::new();
        summaries.insert(
            "홍길동".to_string(),
            TeacherSummary {
                pattern_a: vec![ConsecutiveRun {
                    day: Weekday::Wednesday,
                    start: 1,
                    end: 4,
                    class_code: ClassCode::new("101"),
                }],
                pattern_b: DayBreadth::default(),
                pattern_c: DayBreadth {
                    triggered: true,
                    days: vec![Weekday::Tuesday, Weekday::Thursday],
                },
            },
        );

        let json = summary_json(&summaries).unwrap();
        assert!(json.contains("\"홍길동\""));
        assert!(json.contains("\"수\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let teacher = &value["teachers"]["홍길동"];
        assert_eq!(teacher["patternA"][0]["class_code"], "101");
        assert_eq!(teacher["patternB"]["triggered"], false);
        assert_eq!(teacher["patternC"]["days"], serde_json::json!(["화", "목"]));
    }

    #[test]
    fn test_write_outputs_to_files() {
        let dir = TempDir::new().unwrap();
        let text_path = dir.path().join("report.txt");
        let json_path = dir.path().join("summary.json");

        write_text_output("본문", Some(&text_path)).unwrap();
        write_json_output(&BTreeMap::new(), Some(&json_path)).unwrap();

        assert_eq!(fs::read_to_string(&text_path).unwrap(), "본문");
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"teachers": {}}));
    }

    #[test]
    fn test_write_to_missing_directory_fails_with_path() {
        let err = write_text_output("x", Some(Path::new("/nonexistent/dir/report.txt"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/report.txt"));
    }
}
