//! Error types for the xlsx2i18n library.

use std::io;
use thiserror::Error;

/// Result type alias for xlsx2i18n operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classification of an [`Error`], used to decide how it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file does not exist.
    NotFound,
    /// The workbook is structurally invalid or lacks required content.
    Validation,
    /// Anything else; reported with full diagnostic detail.
    Unexpected,
}

/// Errors that can occur while extracting translations.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required workbook part is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The workbook does not register any sheet.
    #[error("No sheets found in workbook")]
    NoSheets,

    /// The requested sheet name is not registered in the workbook.
    #[error("Sheet '{name}' not found. Available: {}", .available.join(", "))]
    SheetNotFound {
        /// Requested sheet name
        name: String,
        /// Sheet names present in the workbook, in registry order
        available: Vec<String>,
    },

    /// The sheet's relationship id does not resolve to a part.
    #[error("Could not find sheet file for '{0}'")]
    UnresolvedSheet(String),

    /// The selected sheet has no rows.
    #[error("Sheet is empty")]
    EmptySheet,

    /// The header row lacks the default-language column.
    #[error("Default column '{0}' not found in headers")]
    MissingDefaultColumn(String),

    /// A cell holds data that cannot be interpreted.
    #[error("Invalid cell {cell}: {reason}")]
    InvalidCell {
        /// Cell reference or position
        cell: String,
        /// What is wrong with it
        reason: String,
    },

    /// Error while serializing the result mapping.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Io(e) if e.kind() == io::ErrorKind::NotFound => ErrorKind::NotFound,
            Error::ZipArchive(_)
            | Error::XmlParse(_)
            | Error::MissingComponent(_)
            | Error::NoSheets
            | Error::SheetNotFound { .. }
            | Error::UnresolvedSheet(_)
            | Error::EmptySheet
            | Error::MissingDefaultColumn(_)
            | Error::InvalidCell { .. } => ErrorKind::Validation,
            Error::Io(_) | Error::Serialize(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
