//! Output rendering for extracted translations.
//!
//! # Example
//!
//! ```no_run
//! use xlsx2i18n::{extract_file, ExtractOptions, render::*};
//!
//! let extraction = extract_file("language.xlsx", &ExtractOptions::default())?;
//! let json = to_json(&extraction.translations, JsonFormat::Pretty)?;
//! # Ok::<(), xlsx2i18n::Error>(())
//! ```

mod json;

pub use json::{to_json, to_json_default, JsonFormat};
