//! Header row interpretation: column names and column roles.

use crate::error::{Error, Result};
use crate::xlsx::RowCells;

use super::options::ExtractOptions;

/// Highest column index read from the header row.
///
/// The real header width is unknown until the header row has been read, so
/// it is scanned with this fixed bound.
pub const HEADER_SCAN_WIDTH: usize = 100;

/// Name of one column, taken from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Trimmed header text, or `col_<index>` for a blank header
    pub name: String,
    /// True when the header cell was blank and the name is a placeholder
    pub synthetic: bool,
}

impl Header {
    fn placeholder(index: usize) -> Self {
        Self {
            name: format!("col_{}", index),
            synthetic: true,
        }
    }
}

/// Build the header list from the header row cells.
///
/// Covers columns 0 through the highest non-empty header cell; blank headers
/// become `col_<index>` placeholders. An empty header row yields `col_0`.
pub fn build_headers(cells: &RowCells) -> Vec<Header> {
    let max_column = cells.max_column().unwrap_or(0);
    (0..=max_column)
        .map(|index| match cells.get(index).trim() {
            "" => Header::placeholder(index),
            name => Header {
                name: name.to_string(),
                synthetic: false,
            },
        })
        .collect()
}

/// Normalize a language header into a tag.
///
/// With abbreviation, Android resource qualifiers become BCP 47 style:
/// every `_r` turns into `-`, then any remaining `_` does too.
pub fn normalize_tag(header: &str, abbreviate: bool) -> String {
    if abbreviate {
        header.replace("_r", "-").replace('_', "-")
    } else {
        header.to_string()
    }
}

/// A column holding translations for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageColumn {
    /// Zero-based column index
    pub index: usize,
    /// Header text as written in the sheet
    pub header: String,
    /// Normalized language tag
    pub tag: String,
}

/// Roles of the sheet columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub headers: Vec<Header>,
    /// Key column, if the sheet has one
    pub key: Option<usize>,
    /// Default-language column
    pub default: usize,
    /// Language columns in column order
    pub languages: Vec<LanguageColumn>,
}

impl ColumnLayout {
    /// Assign roles to the headers.
    ///
    /// Fails when no header matches the default column name.
    pub fn classify(headers: Vec<Header>, options: &ExtractOptions) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.name == name);
        let key = position(&options.key_column);
        let default = position(&options.default_column)
            .ok_or_else(|| Error::MissingDefaultColumn(options.default_column.clone()))?;

        let languages = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                !h.synthetic
                    && !h.name.is_empty()
                    && h.name != options.key_column
                    && h.name != options.default_column
                    && !options.excluded_headers.contains(&h.name)
            })
            .map(|(index, h)| LanguageColumn {
                index,
                header: h.name.clone(),
                tag: normalize_tag(&h.name, options.abbreviate),
            })
            .collect();

        Ok(Self {
            headers,
            key,
            default,
            languages,
        })
    }

    /// Highest column index covered by the headers.
    pub fn max_column(&self) -> usize {
        self.headers.len().saturating_sub(1)
    }
}
