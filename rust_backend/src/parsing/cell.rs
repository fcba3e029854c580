//! Cell normalization: raw cell value to class code.
//!
//! Schedule cells typically read `"203\n수학"`: a class code on the first line
//! and free-form annotations below it. Only the leading digits of the first
//! line matter. Anything that does not fit degrades to "no class" and never
//! fails the scan.

use super::grid::CellValue;
use crate::core::domain::decimal_digit_value;
use crate::core::ClassCode;

/// Carriage-return artifact that spreadsheet exports embed before line breaks.
const CR_ARTIFACT: &str = "_x000D_\n";

/// Collapses spreadsheet line-break artifacts into plain `\n` line breaks.
///
/// # Examples
///
/// ```
/// use timetable_checker::parsing::cell::normalize_cell_text;
///
/// assert_eq!(normalize_cell_text("101_x000D_\n국어"), "101\n국어");
/// assert_eq!(normalize_cell_text("101\r\n국어\r비고"), "101\n국어\n비고");
/// ```
pub fn normalize_cell_text(value: &str) -> String {
    value
        .replace(CR_ARTIFACT, "\n")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

/// Extracts the class code of a schedule cell.
///
/// Returns `None` for non-text cells and for text whose first line does not
/// start (after optional whitespace) with decimal digits. Full-width digits
/// count as digits and are kept as written.
///
/// # Examples
///
/// ```
/// use timetable_checker::parsing::cell::parse_cell_to_class;
/// use timetable_checker::parsing::grid::CellValue;
///
/// let code = parse_cell_to_class(&CellValue::text(" 305\n영어"));
/// assert_eq!(code.unwrap().as_str(), "305");
/// assert!(parse_cell_to_class(&CellValue::text("창체")).is_none());
/// assert!(parse_cell_to_class(&CellValue::Number(101.0)).is_none());
/// ```
pub fn parse_cell_to_class(value: &CellValue) -> Option<ClassCode> {
    let text = value.as_text()?;
    let text = normalize_cell_text(text);
    let first_line = text.split('\n').next().unwrap_or_default();
    leading_digits(first_line).map(ClassCode::new)
}

fn leading_digits(line: &str) -> Option<&str> {
    let rest = line.trim_start();
    let end = rest
        .char_indices()
        .find(|(_, c)| decimal_digit_value(*c).is_none())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    (end > 0).then(|| &rest[..end])
}
