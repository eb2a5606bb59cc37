//! Worksheet row parsing and column reference arithmetic.

use crate::container::attr_value;
use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use std::collections::BTreeMap;
use std::num::IntErrorKind;

use super::shared_strings::SharedStrings;

/// Convert column letters to a zero-based index.
///
/// Column letters are a bijective base-26 numeral (A=1 … Z=26, AA=27 …), so
/// "A" is 0, "Z" is 25 and "AA" is 26. Lowercase letters are accepted.
/// Returns `None` for an empty string, non-letters, or overflow.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut index = 0usize;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let digit = (ch.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Convert a zero-based column index to its letters (0 → "A", 26 → "AA").
pub fn column_letters(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index;
    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// Column index from a cell reference such as "AB12"; digits are ignored.
fn reference_column(reference: &str) -> Option<usize> {
    let letters: String = reference
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect();
    column_index(&letters)
}

/// Raw content of a cell as stored in the sheet part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Index into the shared strings table, as written in `<v>`
    Shared(String),
    /// Literal text: numbers, booleans, formula results, inline strings
    Literal(String),
}

/// A cell of a sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCell {
    /// Zero-based column index
    pub column: usize,
    /// Cell content; `None` when the cell has no value node or it is empty
    pub value: Option<CellValue>,
}

/// A `<row>` element with its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// One-based row number
    pub number: u32,
    /// Cells in document order
    pub cells: Vec<RawCell>,
}

impl SheetRow {
    /// Resolve the row into a sparse column → text mapping.
    ///
    /// Cells beyond `max_column` are skipped. Shared-string references that
    /// fall outside the table are skipped as well.
    pub fn cells(&self, shared_strings: &SharedStrings, max_column: usize) -> Result<RowCells> {
        let mut cells = RowCells::new();

        for cell in &self.cells {
            if cell.column > max_column {
                continue;
            }
            let text = match &cell.value {
                Some(CellValue::Shared(raw)) => {
                    let reference = format!("{}{}", column_letters(cell.column), self.number);
                    let index = match raw.trim().parse::<i64>() {
                        Ok(index) => usize::try_from(index).ok(),
                        Err(e)
                            if matches!(
                                e.kind(),
                                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                            ) =>
                        {
                            None
                        }
                        Err(_) => {
                            return Err(Error::InvalidCell {
                                cell: reference,
                                reason: format!("shared string index '{}' is not an integer", raw),
                            })
                        }
                    };
                    match index.and_then(|i| shared_strings.get(i)) {
                        Some(text) => text,
                        None => {
                            log::warn!(
                                "{}: shared string index {} out of range ({} entries)",
                                reference,
                                raw.trim(),
                                shared_strings.len()
                            );
                            continue;
                        }
                    }
                }
                Some(CellValue::Literal(text)) => text.as_str(),
                None => continue,
            };
            cells.insert(cell.column, text);
        }

        Ok(cells)
    }
}

/// Sparse cell texts of one row, keyed by column index.
///
/// Only non-empty cells are stored; an absent column reads as "".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCells {
    cells: BTreeMap<usize, String>,
}

impl RowCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the text of a column. Empty text is not stored.
    pub fn insert(&mut self, column: usize, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            self.cells.remove(&column);
        } else {
            self.cells.insert(column, text);
        }
    }

    /// Text of a column, "" when the cell is absent.
    pub fn get(&self, column: usize) -> &str {
        self.cells.get(&column).map(String::as_str).unwrap_or("")
    }

    /// Whether the column holds a non-empty cell.
    pub fn contains(&self, column: usize) -> bool {
        self.cells.contains_key(&column)
    }

    /// Highest column index holding a cell.
    pub fn max_column(&self) -> Option<usize> {
        self.cells.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.cells.iter().map(|(&c, t)| (c, t.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(usize, S)> for RowCells {
    fn from_iter<I: IntoIterator<Item = (usize, S)>>(iter: I) -> Self {
        let mut cells = Self::new();
        for (column, text) in iter {
            cells.insert(column, text);
        }
        cells
    }
}

/// Which text node of a cell is being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    InlineString,
}

/// Cell being assembled while reading a `<c>` element.
struct PendingCell {
    column: usize,
    cell_type: Option<String>,
    value: String,
    inline: String,
    has_value: bool,
}

impl PendingCell {
    fn start(e: &BytesStart<'_>, next_column: usize) -> Self {
        let mut column = None;
        let mut cell_type = None;
        for attr in e.attributes().flatten() {
            match attr.key.local_name().as_ref() {
                b"r" => column = reference_column(&attr_value(&attr)),
                b"t" => cell_type = Some(attr_value(&attr)),
                _ => {}
            }
        }
        Self {
            column: column.unwrap_or(next_column),
            cell_type,
            value: String::new(),
            inline: String::new(),
            has_value: false,
        }
    }

    fn finish(self) -> RawCell {
        let value = match self.cell_type.as_deref() {
            Some("s") if self.has_value && !self.value.is_empty() => {
                Some(CellValue::Shared(self.value))
            }
            Some("inlineStr") if !self.inline.is_empty() => Some(CellValue::Literal(self.inline)),
            _ if self.has_value && !self.value.is_empty() => Some(CellValue::Literal(self.value)),
            _ => None,
        };
        RawCell {
            column: self.column,
            value,
        }
    }
}

fn row_number(e: &BytesStart<'_>, previous: u32) -> Result<u32> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"r" {
            let raw = attr_value(&attr);
            return raw
                .trim()
                .parse::<u32>()
                .map_err(|_| Error::XmlParse(format!("invalid row number '{}'", raw)));
        }
    }
    previous
        .checked_add(1)
        .ok_or_else(|| Error::XmlParse(format!("row after row {} has no valid number", previous)))
}

fn column_after(column: usize) -> Result<usize> {
    column
        .checked_add(1)
        .ok_or_else(|| Error::XmlParse(format!("cell after column {} has no valid column", column)))
}

/// Parse all `<row>` elements of a worksheet part, in document order.
///
/// Rows without an `r` attribute follow the previous row; cells without a
/// usable reference follow the previous cell.
pub fn parse_rows(xml: &str) -> Result<Vec<SheetRow>> {
    let mut rows = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::new();
    let mut current_row: Option<SheetRow> = None;
    let mut current_cell: Option<PendingCell> = None;
    let mut target = TextTarget::None;
    let mut in_inline = false;
    let mut last_number = 0u32;
    let mut next_column = 0usize;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().local_name().as_ref() {
                b"row" => {
                    last_number = row_number(e, last_number)?;
                    next_column = 0;
                    current_row = Some(SheetRow {
                        number: last_number,
                        cells: Vec::new(),
                    });
                }
                b"c" if current_row.is_some() => {
                    current_cell = Some(PendingCell::start(e, next_column));
                }
                b"v" if current_cell.is_some() => {
                    target = TextTarget::Value;
                    if let Some(cell) = current_cell.as_mut() {
                        cell.has_value = true;
                    }
                }
                b"is" if current_cell.is_some() => in_inline = true,
                b"t" if in_inline => target = TextTarget::InlineString,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.name().local_name().as_ref() {
                b"row" => {
                    last_number = row_number(e, last_number)?;
                    rows.push(SheetRow {
                        number: last_number,
                        cells: Vec::new(),
                    });
                }
                b"c" => {
                    if let Some(row) = current_row.as_mut() {
                        let cell = PendingCell::start(e, next_column);
                        next_column = column_after(cell.column)?;
                        row.cells.push(cell.finish());
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if target != TextTarget::None => {
                let text = e
                    .unescape()
                    .map_err(|err| Error::XmlParse(err.to_string()))?;
                if let Some(cell) = current_cell.as_mut() {
                    match target {
                        TextTarget::Value => cell.value.push_str(&text),
                        TextTarget::InlineString => cell.inline.push_str(&text),
                        TextTarget::None => {}
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.name().local_name().as_ref() {
                b"row" => {
                    if let Some(row) = current_row.take() {
                        rows.push(row);
                    }
                }
                b"c" => {
                    if let (Some(cell), Some(row)) = (current_cell.take(), current_row.as_mut()) {
                        next_column = column_after(cell.column)?;
                        row.cells.push(cell.finish());
                    }
                    in_inline = false;
                    target = TextTarget::None;
                }
                b"is" => in_inline = false,
                b"v" | b"t" => target = TextTarget::None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(rows)
}
