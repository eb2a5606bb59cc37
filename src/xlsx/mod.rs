//! Minimal XLSX reader.
//!
//! Reads just what translation extraction needs from an Office Open XML
//! workbook: the sheet registry, the shared strings table and the cell text
//! of worksheet rows.
//!
//! # Example
//!
//! ```no_run
//! use xlsx2i18n::xlsx::Workbook;
//!
//! let workbook = Workbook::open("language.xlsx")?;
//! let sheet = workbook.resolve_sheet(None)?;
//! for row in workbook.read_rows(&sheet)? {
//!     let cells = row.cells(workbook.shared_strings(), 100)?;
//!     println!("row {}: {} cells", row.number, cells.len());
//! }
//! # Ok::<(), xlsx2i18n::Error>(())
//! ```

mod shared_strings;
mod sheet;
mod workbook;

pub use shared_strings::SharedStrings;
pub use sheet::{column_index, column_letters, parse_rows, CellValue, RawCell, RowCells, SheetRow};
pub use workbook::{ResolvedSheet, SheetEntry, Workbook};
