//! Translation extraction from worksheet rows.
//!
//! The header row names the columns. One column supplies text keys, one the
//! default-language text, and every other named column (minus excluded
//! metadata headers) is a language whose tag comes from its header.
//!
//! # Example
//!
//! ```no_run
//! use xlsx2i18n::i18n::{extract, ExtractOptions};
//! use xlsx2i18n::xlsx::Workbook;
//!
//! let workbook = Workbook::open("language.xlsx")?;
//! let options = ExtractOptions::new().with_sheet("buff-web").with_rows(275, Some(305));
//! let extraction = extract(&workbook, &options)?;
//!
//! for (tag, texts) in extraction.translations.iter() {
//!     println!("{}: {} texts", tag, texts.len());
//! }
//! # Ok::<(), xlsx2i18n::Error>(())
//! ```

mod extractor;
mod headers;
mod options;
mod translations;

pub use extractor::{extract, Extraction};
pub use headers::{
    build_headers, normalize_tag, ColumnLayout, Header, LanguageColumn, HEADER_SCAN_WIDTH,
};
pub use options::{ExtractOptions, DEFAULT_EXCLUDED_HEADERS};
pub use translations::{TextTable, Translations};
