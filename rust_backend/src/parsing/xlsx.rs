//! XLSX workbook reader implementing [`GridSource`].
//!
//! Reads the OOXML package directly: the workbook part for sheet names, its
//! relationships to find the worksheet part, the shared string table, and the
//! worksheet cells. Cached cell values are used as-is, formulas are not
//! evaluated.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

use super::grid::{CellValue, GridSource};
use crate::error::{TimetableError, TimetableResult};

static ABSENT: CellValue = CellValue::Absent;

/// A worksheet loaded from an `.xlsx` file.
#[derive(Debug, Clone)]
pub struct XlsxGrid {
    sheet_name: String,
    cells: HashMap<(u32, u32), CellValue>,
    max_row: u32,
    max_column: u32,
}

impl XlsxGrid {
    /// Opens `path` and loads `preferred_sheet`, or the first sheet when the
    /// workbook has no sheet of that name.
    pub fn open<P: AsRef<Path>>(path: P, preferred_sheet: &str) -> TimetableResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(file, preferred_sheet)
    }

    /// Loads a worksheet from any seekable XLSX byte source.
    pub fn from_reader<R: Read + Seek>(reader: R, preferred_sheet: &str) -> TimetableResult<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let workbook_xml = read_part(&mut archive, "xl/workbook.xml")?.ok_or_else(|| {
            TimetableError::WorkbookError("missing xl/workbook.xml, not an XLSX workbook".to_string())
        })?;
        let sheets = parse_workbook_xml(&workbook_xml)?;
        let (index, sheet) = select_sheet(&sheets, preferred_sheet)?;

        let relationships = match read_part(&mut archive, "xl/_rels/workbook.xml.rels")? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };
        let target = resolve_sheet_target(sheet, &relationships, index);

        let shared_strings = match read_part(&mut archive, "xl/sharedStrings.xml")? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        let sheet_xml = read_part(&mut archive, &target)?.ok_or_else(|| {
            TimetableError::WorkbookError(format!(
                "worksheet part '{}' for sheet '{}' is missing",
                target, sheet.name
            ))
        })?;
        let mut grid = parse_sheet_xml(&sheet_xml, &shared_strings)?;
        grid.sheet_name = sheet.name.clone();

        info!(
            "Loaded sheet '{}' ({} rows x {} columns, {} cells)",
            grid.sheet_name,
            grid.max_row,
            grid.max_column,
            grid.cells.len()
        );
        Ok(grid)
    }

    /// Name of the worksheet that was loaded.
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }
}

impl GridSource for XlsxGrid {
    fn cell_value(&self, row: u32, col: u32) -> &CellValue {
        self.cells.get(&(row, col)).unwrap_or(&ABSENT)
    }

    fn max_row(&self) -> u32 {
        self.max_row
    }

    fn max_column(&self) -> u32 {
        self.max_column
    }
}

#[derive(Debug, Clone)]
struct SheetDescriptor {
    name: String,
    rel_id: Option<String>,
    sheet_id: Option<u32>,
}

fn read_part<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> TimetableResult<Option<Vec<u8>>> {
    let mut part = match archive.by_name(name) {
        Ok(part) => part,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::with_capacity(part.size() as usize);
    part.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn select_sheet<'a>(
    sheets: &'a [SheetDescriptor],
    preferred: &str,
) -> TimetableResult<(usize, &'a SheetDescriptor)> {
    if let Some(found) = sheets.iter().enumerate().find(|(_, s)| s.name == preferred) {
        return Ok(found);
    }
    let first = sheets
        .first()
        .ok_or_else(|| TimetableError::WorkbookError("workbook has no sheets".to_string()))?;
    warn!(
        "Sheet '{}' not found, falling back to first sheet '{}'",
        preferred, first.name
    );
    Ok((0, first))
}

fn parse_workbook_xml(xml: &[u8]) -> TimetableResult<Vec<SheetDescriptor>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                let name = get_attr_value(&e, b"name")?;
                let rel_id = get_attr_value(&e, b"r:id")?;
                let sheet_id = get_attr_value(&e, b"sheetId")?.and_then(|v| v.parse().ok());
                if let Some(name) = name {
                    sheets.push(SheetDescriptor {
                        name,
                        rel_id,
                        sheet_id,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

fn parse_relationships(xml: &[u8]) -> TimetableResult<HashMap<String, String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    let mut map = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                let id = get_attr_value(&e, b"Id")?;
                let target = get_attr_value(&e, b"Target")?;
                let rel_type = get_attr_value(&e, b"Type")?.unwrap_or_default();
                if let (Some(id), Some(target)) = (id, target) {
                    if rel_type.contains("worksheet") {
                        map.insert(id, target);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(map)
}

fn resolve_sheet_target(
    sheet: &SheetDescriptor,
    relationships: &HashMap<String, String>,
    index: usize,
) -> String {
    if let Some(target) = sheet.rel_id.as_ref().and_then(|id| relationships.get(id)) {
        return normalize_target(target);
    }
    let guessed = sheet
        .sheet_id
        .map(|id| format!("worksheets/sheet{}.xml", id))
        .unwrap_or_else(|| format!("worksheets/sheet{}.xml", index + 1));
    debug!("No relationship for sheet '{}', guessing {}", sheet.name, guessed);
    normalize_target(&guessed)
}

fn normalize_target(target: &str) -> String {
    let trimmed = target.trim_start_matches('/');
    if trimmed.starts_with("xl/") {
        trimmed.to_string()
    } else {
        format!("xl/{}", trimmed)
    }
}

fn parse_shared_strings(xml: &[u8]) -> TimetableResult<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    // Phonetic runs (<rPh>) carry furigana-style hints, not cell text.
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"si" => {
                current.clear();
                in_si = true;
            }
            Event::Start(e) if e.local_name().as_ref() == b"rPh" => in_phonetic = true,
            Event::End(e) if e.local_name().as_ref() == b"rPh" => in_phonetic = false,
            Event::Start(e) if e.local_name().as_ref() == b"t" && in_si && !in_phonetic => {
                let text = reader.read_text(e.name())?;
                current.push_str(&unescape(&text)?);
            }
            Event::End(e) if e.local_name().as_ref() == b"si" => {
                strings.push(std::mem::take(&mut current));
                in_si = false;
            }
            Event::Empty(e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

fn parse_sheet_xml(xml: &[u8], shared_strings: &[String]) -> TimetableResult<XlsxGrid> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();

    let mut dimension_hint: Option<(u32, u32)> = None;
    let mut cells = HashMap::new();
    let mut max_row = 0;
    let mut max_column = 0;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"dimension" => {
                dimension_hint = get_attr_value(&e, b"ref")?.and_then(|r| dimension_from_ref(&r));
            }
            Event::Start(e) if e.local_name().as_ref() == b"c" => {
                if let Some((row, col, value)) = parse_cell(&mut reader, &e, shared_strings)? {
                    if !value.is_absent() {
                        max_row = max_row.max(row);
                        max_column = max_column.max(col);
                        cells.insert((row, col), value);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some((rows, cols)) = dimension_hint {
        max_row = max_row.max(rows);
        max_column = max_column.max(cols);
    }

    Ok(XlsxGrid {
        sheet_name: String::new(),
        cells,
        max_row,
        max_column,
    })
}

/// Reads one `<c>` element. A cell whose address cannot be read is consumed
/// and dropped with a warning.
fn parse_cell(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart<'_>,
    shared_strings: &[String],
) -> TimetableResult<Option<(u32, u32, CellValue)>> {
    let address = get_attr_value(start, b"r")?.unwrap_or_default();
    let position = address_to_index(&address);
    let cell_type = get_attr_value(start, b"t")?;

    let mut value_text: Option<String> = None;
    let mut inline_text: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"v" => {
                let text = reader.read_text(e.name())?;
                value_text = Some(unescape(&text)?);
            }
            Event::Start(e) if e.local_name().as_ref() == b"is" => {
                inline_text = Some(read_inline_string(reader)?);
            }
            Event::End(e) if e.local_name().as_ref() == b"c" => break,
            Event::Eof => {
                return Err(TimetableError::WorkbookError(format!(
                    "unexpected end of sheet inside cell {}",
                    address
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    let Some((row, col)) = position else {
        warn!("Skipping cell with unreadable address '{}'", address);
        return Ok(None);
    };
    let value = match inline_text {
        Some(text) => CellValue::Text(text),
        None => convert_value(&address, value_text, cell_type.as_deref(), shared_strings),
    };
    Ok(Some((row, col, value)))
}

fn read_inline_string(reader: &mut Reader<&[u8]>) -> TimetableResult<String> {
    let mut buf = Vec::new();
    let mut value = String::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => {
                let text = reader.read_text(e.name())?;
                value.push_str(&unescape(&text)?);
            }
            Event::End(e) if e.local_name().as_ref() == b"is" => break,
            Event::Eof => {
                return Err(TimetableError::WorkbookError(
                    "unexpected end of sheet inside inline string".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(value)
}

fn convert_value(
    address: &str,
    value_text: Option<String>,
    cell_type: Option<&str>,
    shared_strings: &[String],
) -> CellValue {
    let Some(raw) = value_text else {
        return CellValue::Absent;
    };

    match cell_type {
        Some("s") => {
            let text = raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared_strings.get(idx));
            match text {
                Some(text) => CellValue::Text(text.clone()),
                None => {
                    warn!("Cell {}: no shared string for index '{}'", address, raw);
                    CellValue::Absent
                }
            }
        }
        Some("str") | Some("inlineStr") => CellValue::Text(raw),
        Some("b") => match raw.trim() {
            "1" => CellValue::Bool(true),
            "0" => CellValue::Bool(false),
            _ => CellValue::Absent,
        },
        Some("e") => CellValue::Error(raw),
        Some("d") => CellValue::Date(raw),
        _ => raw
            .trim()
            .parse::<f64>()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Text(raw)),
    }
}

/// Converts an A1-style reference to 1-indexed `(row, column)`.
fn address_to_index(address: &str) -> Option<(u32, u32)> {
    let address = address.trim().trim_start_matches('$');
    let split = address.find(|c: char| !c.is_ascii_alphabetic())?;
    let (letters, digits) = address.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        let value = (ch.to_ascii_uppercase() as u32) - ('A' as u32) + 1;
        col = col.checked_mul(26)?.checked_add(value)?;
    }
    let row: u32 = digits.trim_start_matches('$').parse().ok()?;
    (row > 0).then_some((row, col))
}

/// Size of a `<dimension ref="A1:AJ40"/>` range, measured from A1.
fn dimension_from_ref(reference: &str) -> Option<(u32, u32)> {
    let end = reference.split(':').last()?;
    address_to_index(end)
}

fn get_attr_value(element: &BytesStart<'_>, key: &[u8]) -> TimetableResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| TimetableError::WorkbookError(e.to_string()))?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn unescape(text: &str) -> TimetableResult<String> {
    quick_xml::escape::unescape(text)
        .map(|s| s.into_owned())
        .map_err(|e| TimetableError::WorkbookError(format!("Malformed workbook XML: {}", e)))
}
