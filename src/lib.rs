//! # xlsx2i18n
//!
//! Extract localized strings from XLSX workbooks into language-grouped
//! i18n JSON.
//!
//! A translation sheet has a header row naming its columns: a key column, a
//! default-language column, and one column per language. Each data row
//! becomes one entry per language:
//!
//! ```text
//! {
//!   "en":    { "greeting": "Hello" },
//!   "zh-CN": { "greeting": "你好" }
//! }
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use xlsx2i18n::{convert_file, extract_file, ExtractOptions};
//!
//! // Extract and inspect
//! let extraction = extract_file("language.xlsx", &ExtractOptions::default())?;
//! for (tag, texts) in extraction.translations.iter() {
//!     println!("{}: {} texts", tag, texts.len());
//! }
//!
//! // Extract and write JSON in one step
//! let options = ExtractOptions::new().with_sheet("buff-web").with_rows(275, Some(305));
//! convert_file("language.xlsx", "i18n.json", &options)?;
//! # Ok::<(), xlsx2i18n::Error>(())
//! ```

pub mod container;
pub mod error;
pub mod i18n;
pub mod render;
pub mod xlsx;

// Re-exports
pub use container::{Package, Relationship, Relationships};
pub use error::{Error, ErrorKind, Result};
pub use i18n::{extract, ExtractOptions, Extraction, TextTable, Translations};
pub use render::JsonFormat;
pub use xlsx::Workbook;

use std::fs;
use std::path::Path;

/// Extract translations from a workbook file.
///
/// # Example
///
/// ```no_run
/// use xlsx2i18n::{extract_file, ExtractOptions};
///
/// let extraction = extract_file("language.xlsx", &ExtractOptions::default())?;
/// println!("Sheet: {}", extraction.sheet_name);
/// # Ok::<(), xlsx2i18n::Error>(())
/// ```
pub fn extract_file(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Extraction> {
    let workbook = Workbook::open(path)?;
    extract(&workbook, options)
}

/// Extract translations from workbook bytes.
///
/// # Example
///
/// ```no_run
/// use xlsx2i18n::{extract_bytes, ExtractOptions};
///
/// let data = std::fs::read("language.xlsx")?;
/// let extraction = extract_bytes(&data, &ExtractOptions::default())?;
/// # Ok::<(), xlsx2i18n::Error>(())
/// ```
pub fn extract_bytes(data: &[u8], options: &ExtractOptions) -> Result<Extraction> {
    let workbook = Workbook::from_bytes(data.to_vec())?;
    extract(&workbook, options)
}

/// Extract translations from `input` and write them to `output` as
/// pretty-printed JSON.
///
/// Nothing is written unless extraction succeeds.
pub fn convert_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<Extraction> {
    convert_file_with_format(input, output, options, JsonFormat::Pretty)
}

/// Like [`convert_file`], with a choice of JSON layout.
pub fn convert_file_with_format(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &ExtractOptions,
    format: JsonFormat,
) -> Result<Extraction> {
    let extraction = extract_file(input, options)?;
    let json = render::to_json(&extraction.translations, format)?;
    fs::write(output, json)?;
    Ok(extraction)
}
