//! Row extraction into language-grouped translations.

use crate::error::{Error, Result};
use crate::xlsx::{RowCells, Workbook};

use super::headers::{build_headers, ColumnLayout, Header, LanguageColumn, HEADER_SCAN_WIDTH};
use super::options::ExtractOptions;
use super::translations::Translations;

/// Outcome of an extraction, with the details needed for progress reports.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Name of the sheet that was read
    pub sheet_name: String,
    /// Entries in the workbook's shared strings table
    pub shared_string_count: usize,
    /// Rows present in the sheet, header included
    pub row_count: usize,
    /// Column names from the header row
    pub headers: Vec<Header>,
    /// Columns interpreted as languages
    pub language_columns: Vec<LanguageColumn>,
    /// Extracted texts
    pub translations: Translations,
}

/// Extract translations from a workbook.
///
/// The first row present in the sheet is the header row. Rows whose number
/// falls inside the configured range contribute entries; a row without
/// default-language text is skipped.
pub fn extract(workbook: &Workbook, options: &ExtractOptions) -> Result<Extraction> {
    let sheet = workbook.resolve_sheet(options.sheet.as_deref())?;
    let rows = workbook.read_rows(&sheet)?;
    let shared_strings = workbook.shared_strings();

    let header_row = rows.first().ok_or(Error::EmptySheet)?;
    let header_cells = header_row.cells(shared_strings, HEADER_SCAN_WIDTH)?;
    let layout = ColumnLayout::classify(build_headers(&header_cells), options)?;
    log::debug!(
        "sheet '{}': {} rows, {} headers, {} language columns",
        sheet.name,
        rows.len(),
        layout.headers.len(),
        layout.languages.len()
    );

    // Rows are sparse: blank rows may be missing, so the default end is
    // the highest row number present rather than the row count.
    let last_row = rows.iter().map(|row| row.number).max().unwrap_or(0);
    let max_column = layout.max_column();

    let mut translations = Translations::new();
    let mut skipped = 0usize;
    for row in rows
        .iter()
        .filter(|row| options.contains_row(row.number, last_row))
    {
        let cells = row.cells(shared_strings, max_column)?;
        if !extract_row(&mut translations, &cells, &layout, &options.default_lang) {
            skipped += 1;
        }
    }
    log::debug!("{} rows without default text skipped", skipped);

    Ok(Extraction {
        sheet_name: sheet.name,
        shared_string_count: shared_strings.len(),
        row_count: rows.len(),
        headers: layout.headers,
        language_columns: layout.languages,
        translations,
    })
}

/// Add the texts of one row. Returns false if the row was skipped.
fn extract_row(
    translations: &mut Translations,
    cells: &RowCells,
    layout: &ColumnLayout,
    default_lang: &str,
) -> bool {
    let default_text = cells.get(layout.default).trim();
    if default_text.is_empty() {
        return false;
    }

    let key = match layout.key.map(|column| cells.get(column).trim()) {
        Some(key) if !key.is_empty() => key,
        _ => default_text,
    };

    translations.insert(default_lang, key, default_text);
    for language in &layout.languages {
        translations.insert(&language.tag, key, cells.get(language.index).trim());
    }
    true
}
