//! ZIP package access for SpreadsheetML workbooks.

use crate::error::{Error, Result};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::Event;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Component, Path};

/// Relationship type of the main workbook part.
pub const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Relationship type of the shared strings part.
pub const REL_SHARED_STRINGS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";

/// A relationship entry from a .rels part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part unless it starts with '/'
    pub target: String,
}

/// Relationships declared by one part, in document order.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    entries: Vec<Relationship>,
    by_id: HashMap<String, usize>,
}

impl Relationships {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a relationship by ID.
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    /// First relationship of the given type.
    pub fn first_of_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.rel_type == rel_type)
    }

    /// Add a relationship. A repeated ID keeps the first declaration.
    pub fn add(&mut self, rel: Relationship) {
        if self.by_id.contains_key(&rel.id) {
            return;
        }
        self.by_id.insert(rel.id.clone(), self.entries.len());
        self.entries.push(rel);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parse the XML of a .rels part.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut rels = Self::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut rel_type = String::new();
                    let mut target = String::new();

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"Id" => id = attr_value(&attr),
                            b"Type" => rel_type = attr_value(&attr),
                            b"Target" => target = attr_value(&attr),
                            _ => {}
                        }
                    }

                    if !id.is_empty() {
                        rels.add(Relationship {
                            id,
                            rel_type,
                            target,
                        });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }
}

/// Read an attribute value, unescaping entities when possible.
pub(crate) fn attr_value(attr: &Attribute<'_>) -> String {
    match attr.unescape_value() {
        Ok(v) => v.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    }
}

/// Decode XML bytes, honoring a UTF-8 or UTF-16 byte order mark.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8 after byte order mark: {}", e))),
        [0xFF, 0xFE, rest @ ..] => {
            decode_utf16(rest, u16::from_le_bytes).map(|s| declare_utf8(&s))
        }
        [0xFE, 0xFF, rest @ ..] => {
            decode_utf16(rest, u16::from_be_bytes).map(|s| declare_utf8(&s))
        }
        _ => match String::from_utf8(bytes.to_vec()) {
            Ok(s) => Ok(s),
            // BOM-less UTF-16: ASCII markup leaves every other byte zero
            Err(_) if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 => {
                decode_utf16(bytes, u16::from_le_bytes).map(|s| declare_utf8(&s))
            }
            Err(_) if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 => {
                decode_utf16(bytes, u16::from_be_bytes).map(|s| declare_utf8(&s))
            }
            Err(_) => Ok(String::from_utf8_lossy(bytes).into_owned()),
        },
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("invalid UTF-16: {}", e)))
}

/// Rewrite a UTF-16 encoding declaration, since the text is now UTF-8.
fn declare_utf8(content: &str) -> String {
    if !content.starts_with("<?xml") {
        return content.to_string();
    }
    match content.find("?>") {
        Some(end) => {
            let (decl, rest) = content.split_at(end + 2);
            let decl = ["\"UTF-16\"", "'UTF-16'", "\"utf-16\"", "'utf-16'"]
                .iter()
                .fold(decl.to_string(), |d, enc| d.replace(enc, "\"UTF-8\""));
            format!("{}{}", decl, rest)
        }
        None => content.to_string(),
    }
}

/// A workbook package: the ZIP archive holding the XML parts.
pub struct Package {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl Package {
    /// Open a package from a file path.
    ///
    /// A missing file is reported as [`Error::NotFound`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        let mut data = Vec::new();
        BufReader::new(file).read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Create a package from the archive bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Read an XML part as a string, failing if it is absent.
    pub fn read_xml(&self, path: &str) -> Result<String> {
        self.read_xml_opt(path)?
            .ok_or_else(|| Error::MissingComponent(path.to_string()))
    }

    /// Read an XML part as a string, or `None` if the archive lacks it.
    pub fn read_xml_opt(&self, path: &str) -> Result<Option<String>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        decode_xml_bytes(&bytes).map(Some)
    }

    /// Check if a part exists in the archive.
    pub fn exists(&self, path: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == path)
    }

    /// Number of entries in the archive.
    pub fn len(&self) -> usize {
        self.archive.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Relationships declared by a part; empty if its .rels part is absent.
    pub fn relationships(&self, part_path: &str) -> Result<Relationships> {
        match self.read_xml_opt(&Self::rels_path(part_path))? {
            Some(xml) if !xml.trim().is_empty() => Relationships::parse(&xml),
            _ => Ok(Relationships::new()),
        }
    }

    /// Package-level relationships (`_rels/.rels`).
    pub fn package_relationships(&self) -> Result<Relationships> {
        self.relationships("")
    }

    /// Path of the .rels part describing `part_path`.
    pub fn rels_path(part_path: &str) -> String {
        let part_path = part_path.trim_start_matches('/');
        if part_path.is_empty() {
            return "_rels/.rels".to_string();
        }
        match part_path.rsplit_once('/') {
            Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
            None => format!("_rels/{}.rels", part_path),
        }
    }

    /// Resolve a relationship target against the part that declares it.
    pub fn resolve_path(base: &str, relative: &str) -> String {
        if let Some(stripped) = relative.strip_prefix('/') {
            return stripped.to_string();
        }

        let mut result = Path::new(base)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    result.pop();
                }
                Component::Normal(c) => result.push(c),
                _ => {}
            }
        }

        path_to_part_name(&result)
    }
}

fn path_to_part_name(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

impl std::fmt::Debug for Package {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Package")
            .field("files", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn zip_of(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        for (name, data) in parts {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        buffer
    }

    #[test]
    fn test_resolve_path() {
        assert_eq!(
            Package::resolve_path("xl/workbook.xml", "worksheets/sheet1.xml"),
            "xl/worksheets/sheet1.xml"
        );
        assert_eq!(
            Package::resolve_path("xl/worksheets/sheet1.xml", "../sharedStrings.xml"),
            "xl/sharedStrings.xml"
        );
        assert_eq!(
            Package::resolve_path("xl/workbook.xml", "/xl/worksheets/sheet2.xml"),
            "xl/worksheets/sheet2.xml"
        );
        assert_eq!(Package::resolve_path("", "xl/workbook.xml"), "xl/workbook.xml");
    }

    #[test]
    fn test_rels_path() {
        assert_eq!(Package::rels_path(""), "_rels/.rels");
        assert_eq!(Package::rels_path("xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(Package::rels_path("/xl/workbook.xml"), "xl/_rels/workbook.xml.rels");
        assert_eq!(Package::rels_path("book.xml"), "_rels/book.xml.rels");
    }

    #[test]
    fn test_parse_relationships() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
  <Relationship Id="rId1" Type="ignored" Target="duplicate.xml"/>
</Relationships>"#;

        let rels = Relationships::parse(xml).unwrap();
        assert_eq!(rels.len(), 2);
        assert_eq!(rels.get("rId1").unwrap().target, "worksheets/sheet1.xml");
        assert_eq!(
            rels.first_of_type(REL_SHARED_STRINGS).unwrap().target,
            "sharedStrings.xml"
        );
        assert!(rels.get("rId9").is_none());
    }

    #[test]
    fn test_read_parts() {
        let data = zip_of(&[("xl/workbook.xml", b"<workbook/>")]);
        let package = Package::from_bytes(data).unwrap();

        assert!(package.exists("xl/workbook.xml"));
        assert_eq!(package.read_xml("xl/workbook.xml").unwrap(), "<workbook/>");
        assert!(package.read_xml_opt("xl/sharedStrings.xml").unwrap().is_none());
        assert!(matches!(
            package.read_xml("xl/sharedStrings.xml"),
            Err(Error::MissingComponent(_))
        ));
        assert!(package.package_relationships().unwrap().is_empty());
    }

    #[test]
    fn test_not_a_zip() {
        let err = Package::from_bytes(b"plain text".to_vec()).unwrap_err();
        assert!(matches!(err, Error::ZipArchive(_)));
    }

    #[test]
    fn test_open_missing_file() {
        let err = Package::open("definitely/not/here.xlsx").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_decode_xml_bytes() {
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        assert_eq!(decode_xml_bytes(b"<a/>").unwrap(), "<a/>");
    }

    #[test]
    fn test_utf16_declaration_rewritten() {
        let text = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(
            decode_xml_bytes(&bytes).unwrap(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>"
        );
    }

    #[test]
    fn test_undecodable_part_is_validation_error() {
        let bad_utf8 = b"\xEF\xBB\xBF<a>\xFF\xFE</a>";
        let err = decode_xml_bytes(bad_utf8).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);

        // unpaired high surrogate
        let bad_utf16 = b"\xFF\xFE<\0\x00\xD8>\0";
        let err = decode_xml_bytes(bad_utf16).unwrap_err();
        assert!(matches!(err, Error::XmlParse(_)));
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }
}
