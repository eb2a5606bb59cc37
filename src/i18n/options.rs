//! Extraction options.

use std::collections::BTreeSet;

/// Header names excluded from language detection unless overridden.
///
/// These are metadata columns of the translation sheets the tool was written
/// for: a free-form remarks column, a platform flag and a location hint.
pub const DEFAULT_EXCLUDED_HEADERS: [&str; 3] = ["特殊说明", "is_android", "location"];

/// Options controlling which rows and columns become translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Sheet to read (None = first sheet in the workbook)
    pub sheet: Option<String>,

    /// First row to extract (1-based, inclusive)
    pub start_row: u32,

    /// Last row to extract (1-based, inclusive; None or 0 = last row present)
    pub end_row: Option<u32>,

    /// Header of the column holding text keys
    pub key_column: String,

    /// Header of the column holding default-language text
    pub default_column: String,

    /// Language tag used for the default column
    pub default_lang: String,

    /// Headers that are never language columns
    pub excluded_headers: BTreeSet<String>,

    /// Rewrite Android-style tags (`zh_rCN` → `zh-CN`)
    pub abbreviate: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            sheet: None,
            start_row: 2,
            end_row: None,
            key_column: "key".to_string(),
            default_column: "default".to_string(),
            default_lang: "en".to_string(),
            excluded_headers: DEFAULT_EXCLUDED_HEADERS
                .iter()
                .map(|h| h.to_string())
                .collect(),
            abbreviate: true,
        }
    }
}

impl ExtractOptions {
    /// Create new extraction options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a sheet by name.
    pub fn with_sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet = Some(name.into());
        self
    }

    /// Set the inclusive row range.
    pub fn with_rows(mut self, start: u32, end: Option<u32>) -> Self {
        self.start_row = start;
        self.end_row = end;
        self
    }

    /// Set the key column header.
    pub fn with_key_column(mut self, name: impl Into<String>) -> Self {
        self.key_column = name.into();
        self
    }

    /// Set the default-language column header.
    pub fn with_default_column(mut self, name: impl Into<String>) -> Self {
        self.default_column = name.into();
        self
    }

    /// Set the tag of the default language.
    pub fn with_default_lang(mut self, tag: impl Into<String>) -> Self {
        self.default_lang = tag.into();
        self
    }

    /// Replace the set of excluded headers.
    pub fn with_excluded_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Enable or disable tag abbreviation.
    pub fn with_abbreviation(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }

    /// Whether a one-based row number lies in the configured range.
    pub(crate) fn contains_row(&self, number: u32, last_row: u32) -> bool {
        let end = match self.end_row {
            Some(0) | None => last_row,
            Some(end) => end,
        };
        (self.start_row..=end).contains(&number)
    }
}
