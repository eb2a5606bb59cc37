//! JSON renderer implementation.

use crate::error::Result;
use crate::i18n::Translations;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert translations to JSON.
///
/// Non-ASCII text is written as-is, never as `\u` escapes.
pub fn to_json(translations: &Translations, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(translations)?,
        JsonFormat::Pretty => serde_json::to_string_pretty(translations)?,
    };
    Ok(json)
}

/// Convert translations to JSON with default formatting.
pub fn to_json_default(translations: &Translations) -> Result<String> {
    to_json(translations, JsonFormat::Pretty)
}
