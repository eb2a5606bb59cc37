//! Workbook-level parts: sheet registry, relationships and shared strings.

use crate::container::{attr_value, Package, Relationships, REL_OFFICE_DOCUMENT, REL_SHARED_STRINGS};
use crate::error::{Error, Result};
use quick_xml::events::Event;
use std::path::Path;

use super::shared_strings::SharedStrings;
use super::sheet::{parse_rows, SheetRow};

const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";
const DEFAULT_SHARED_STRINGS_PATH: &str = "xl/sharedStrings.xml";

/// A sheet registered in the workbook part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetEntry {
    /// Display name of the sheet
    pub name: String,
    /// Relationship id pointing at the sheet part
    pub rel_id: String,
}

/// A sheet selected for extraction, with its part path inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSheet {
    pub name: String,
    pub path: String,
}

/// An opened XLSX workbook.
#[derive(Debug)]
pub struct Workbook {
    package: Package,
    workbook_path: String,
    sheets: Vec<SheetEntry>,
    relationships: Relationships,
    shared_strings: SharedStrings,
}

impl Workbook {
    /// Open a workbook file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Open a workbook from its archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_package(Package::from_bytes(data)?)
    }

    /// Read the workbook part, its relationships and the shared strings.
    pub fn from_package(package: Package) -> Result<Self> {
        let workbook_path = Self::locate_workbook(&package)?;
        log::debug!("workbook part: {}", workbook_path);

        let xml = package.read_xml(&workbook_path)?;
        let sheets = parse_sheet_registry(&xml)?;
        let relationships = package.relationships(&workbook_path)?;

        let shared_strings_path = relationships
            .first_of_type(REL_SHARED_STRINGS)
            .map(|rel| Package::resolve_path(&workbook_path, &rel.target))
            .unwrap_or_else(|| DEFAULT_SHARED_STRINGS_PATH.to_string());
        let shared_strings = match package.read_xml_opt(&shared_strings_path)? {
            Some(xml) => SharedStrings::parse(&xml)?,
            None => SharedStrings::default(),
        };
        log::debug!(
            "{} sheets, {} shared strings",
            sheets.len(),
            shared_strings.len()
        );

        Ok(Self {
            package,
            workbook_path,
            sheets,
            relationships,
            shared_strings,
        })
    }

    /// Workbook part path from the package relationships.
    fn locate_workbook(package: &Package) -> Result<String> {
        let rels = package.package_relationships()?;
        Ok(rels
            .first_of_type(REL_OFFICE_DOCUMENT)
            .map(|rel| Package::resolve_path("", &rel.target))
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PATH.to_string()))
    }

    /// Select a sheet by name, or the first registered sheet.
    pub fn resolve_sheet(&self, name: Option<&str>) -> Result<ResolvedSheet> {
        let entry = match name {
            Some(name) => self
                .sheets
                .iter()
                .find(|s| s.name == name)
                .ok_or_else(|| Error::SheetNotFound {
                    name: name.to_string(),
                    available: self.sheet_names().into_iter().map(String::from).collect(),
                })?,
            None => self.sheets.first().ok_or(Error::NoSheets)?,
        };

        let rel = self
            .relationships
            .get(&entry.rel_id)
            .filter(|rel| !rel.target.is_empty())
            .ok_or_else(|| Error::UnresolvedSheet(entry.name.clone()))?;
        let path = Package::resolve_path(&self.workbook_path, &rel.target);
        log::debug!("sheet '{}' -> {}", entry.name, path);

        Ok(ResolvedSheet {
            name: entry.name.clone(),
            path,
        })
    }

    /// Parse the rows of a resolved sheet.
    pub fn read_rows(&self, sheet: &ResolvedSheet) -> Result<Vec<SheetRow>> {
        let xml = self.package.read_xml(&sheet.path)?;
        parse_rows(&xml)
    }

    /// Get sheet names in registry order.
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// Registered sheets in registry order.
    pub fn sheets(&self) -> &[SheetEntry] {
        &self.sheets
    }

    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }
}

/// Parse the `<sheets>` registry of a workbook part.
fn parse_sheet_registry(xml: &str) -> Result<Vec<SheetEntry>> {
    let mut sheets = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.name().local_name().as_ref() == b"sheet" =>
            {
                let mut name = String::new();
                let mut rel_id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"name" => name = attr_value(&attr),
                        // r:id; sheetId has a different local name
                        b"id" => rel_id = attr_value(&attr),
                        _ => {}
                    }
                }

                if !name.is_empty() {
                    sheets.push(SheetEntry { name, rel_id });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}
