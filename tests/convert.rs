//! End-to-end extraction tests on workbooks generated in memory.

use std::fs;
use std::io::{Cursor, Write};
use xlsx2i18n::xlsx::column_letters;
use xlsx2i18n::{
    convert_file, extract_bytes, extract_file, Error, ErrorKind, ExtractOptions, JsonFormat,
};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Builds minimal XLSX packages with shared-string cells.
#[derive(Default)]
struct WorkbookBuilder {
    shared: Vec<String>,
    sheets: Vec<(String, String)>,
}

impl WorkbookBuilder {
    fn new() -> Self {
        Self::default()
    }

    fn shared_index(&mut self, text: &str) -> usize {
        match self.shared.iter().position(|s| s == text) {
            Some(i) => i,
            None => {
                self.shared.push(text.to_string());
                self.shared.len() - 1
            }
        }
    }

    /// Add a sheet; each row lists its number and cell texts from column A.
    /// Empty texts leave the cell out.
    fn sheet(mut self, name: &str, rows: &[(u32, &[&str])]) -> Self {
        let mut data = String::new();
        for (number, cells) in rows {
            data.push_str(&format!("<row r=\"{}\">", number));
            for (column, text) in cells.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }
                let index = self.shared_index(text);
                data.push_str(&format!(
                    "<c r=\"{}{}\" t=\"s\"><v>{}</v></c>",
                    column_letters(column),
                    number,
                    index
                ));
            }
            data.push_str("</row>");
        }
        self.sheets.push((name.to_string(), data));
        self
    }

    /// Add a sheet with hand-written `<sheetData>` content.
    fn raw_sheet(mut self, name: &str, sheet_data: &str) -> Self {
        self.sheets.push((name.to_string(), sheet_data.to_string()));
        self
    }

    fn shared_strings(mut self, texts: &[&str]) -> Self {
        self.shared = texts.iter().map(|t| t.to_string()).collect();
        self
    }

    fn build(&self) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
</Types>"#,
        )
        .unwrap();

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#,
        )
        .unwrap();

        let mut workbook = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
        );
        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (i, (name, _)) in self.sheets.iter().enumerate() {
            let n = i + 1;
            workbook.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(name),
                n,
                n
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));
        }
        if !self.shared.is_empty() {
            rels.push_str(
                r#"<Relationship Id="rIdSst" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
            );
        }
        workbook.push_str("</sheets></workbook>");
        rels.push_str("</Relationships>");

        zip.start_file("xl/workbook.xml", options).unwrap();
        zip.write_all(workbook.as_bytes()).unwrap();
        zip.start_file("xl/_rels/workbook.xml.rels", options).unwrap();
        zip.write_all(rels.as_bytes()).unwrap();

        for (i, (_, data)) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    data
                )
                .as_bytes(),
            )
            .unwrap();
        }

        if !self.shared.is_empty() {
            let mut sst = String::from(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
            );
            for text in &self.shared {
                sst.push_str(&format!("<si><t xml:space=\"preserve\">{}</t></si>", escape(text)));
            }
            sst.push_str("</sst>");
            zip.start_file("xl/sharedStrings.xml", options).unwrap();
            zip.write_all(sst.as_bytes()).unwrap();
        }

        zip.finish().unwrap();
        buffer
    }
}

const HEADER: &[&str] = &["key", "default", "zh_rCN", "ja", "is_android"];

/// Language sheet with a header row and rows 2..=8.
fn language_workbook() -> Vec<u8> {
    WorkbookBuilder::new()
        .sheet(
            "app",
            &[
                (1, HEADER),
                (2, &["greeting", "Hello", "你好", "こんにちは", "1"]),
                (3, &["farewell", "Goodbye", "再见", "", "0"]),
                (4, &["", "Thanks", "谢谢", "ありがとう"]),
                (5, &["blank", "   ", "空白", "空白"]),
                (6, &["yes", "Yes", "是"]),
                (7, &["no", "No", "否", "いいえ"]),
                (8, &["ok", "OK", "好"]),
            ],
        )
        .build()
}

fn texts(json: &serde_json::Value, tag: &str) -> Vec<String> {
    json[tag]
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

#[test]
fn test_extract_groups_by_language() {
    let extraction = extract_bytes(&language_workbook(), &ExtractOptions::default()).unwrap();

    assert_eq!(extraction.sheet_name, "app");
    assert_eq!(extraction.row_count, 8);
    let tags: Vec<&str> = extraction.translations.iter().map(|(t, _)| t).collect();
    assert_eq!(tags, vec!["en", "zh-CN", "ja"]);

    let en = extraction.translations.get("en").unwrap();
    assert_eq!(
        en.keys().collect::<Vec<_>>(),
        vec!["greeting", "farewell", "Thanks", "yes", "no", "ok"]
    );
    assert_eq!(en.get("greeting"), Some("Hello"));

    let ja = extraction.translations.get("ja").unwrap();
    assert_eq!(ja.get("farewell"), None);
    assert_eq!(ja.get("Thanks"), Some("ありがとう"));
}

#[test]
fn test_excluded_column_not_a_language() {
    let extraction = extract_bytes(&language_workbook(), &ExtractOptions::default()).unwrap();
    assert!(extraction.translations.get("is-android").is_none());
    assert!(extraction
        .language_columns
        .iter()
        .all(|c| c.header != "is_android"));
}

#[test]
fn test_self_keying() {
    let extraction = extract_bytes(&language_workbook(), &ExtractOptions::default()).unwrap();
    let en = extraction.translations.get("en").unwrap();
    assert_eq!(en.get("Thanks"), Some("Thanks"));
    assert_eq!(
        extraction.translations.get("zh-CN").unwrap().get("Thanks"),
        Some("谢谢")
    );
}

#[test]
fn test_rows_without_default_contribute_nothing() {
    let extraction = extract_bytes(&language_workbook(), &ExtractOptions::default()).unwrap();
    for (_, table) in extraction.translations.iter() {
        assert!(!table.contains_key("blank"));
        assert!(table.iter().all(|(_, text)| text != "空白"));
    }
}

#[test]
fn test_every_key_has_default_text() {
    let extraction = extract_bytes(&language_workbook(), &ExtractOptions::default()).unwrap();
    let en = extraction.translations.get("en").unwrap();
    for (_, table) in extraction.translations.iter() {
        for key in table.keys() {
            assert!(en.contains_key(key), "key {} missing from default", key);
        }
    }
}

#[test]
fn test_row_range_bounds() {
    let options = ExtractOptions::new().with_rows(5, Some(7));
    let extraction = extract_bytes(&language_workbook(), &options).unwrap();

    let en = extraction.translations.get("en").unwrap();
    assert_eq!(en.keys().collect::<Vec<_>>(), vec!["yes", "no"]);
    assert!(extraction.translations.get("ja").unwrap().contains_key("no"));
    assert!(!extraction.translations.get("en").unwrap().contains_key("ok"));
}

#[test]
fn test_abbreviation_toggle() {
    let data = language_workbook();

    let abbreviated = extract_bytes(&data, &ExtractOptions::default()).unwrap();
    assert!(abbreviated.translations.get("zh-CN").is_some());

    let options = ExtractOptions::new().with_abbreviation(false);
    let full = extract_bytes(&data, &options).unwrap();
    assert!(full.translations.get("zh_rCN").is_some());
    assert!(full.translations.get("zh-CN").is_none());
}

#[test]
fn test_custom_columns_and_default_lang() {
    let data = WorkbookBuilder::new()
        .sheet(
            "strings",
            &[
                (1, &["id", "en", "de"]),
                (2, &["save", "Save", "Speichern"]),
            ],
        )
        .build();
    let options = ExtractOptions::new()
        .with_key_column("id")
        .with_default_column("en")
        .with_default_lang("en-US");

    let extraction = extract_bytes(&data, &options).unwrap();
    let tags: Vec<&str> = extraction.translations.iter().map(|(t, _)| t).collect();
    assert_eq!(tags, vec!["en-US", "de"]);
    assert_eq!(
        extraction.translations.get("de").unwrap().get("save"),
        Some("Speichern")
    );
}

#[test]
fn test_shared_string_resolution() {
    let data = WorkbookBuilder::new()
        .shared_strings(&["default", "zero", "one", "two", "three"])
        .raw_sheet(
            "s",
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c></row>
<row r="3"><c r="A3" t="s"><v>7</v></c></row>"#,
        )
        .build();

    let extraction = extract_bytes(&data, &ExtractOptions::default()).unwrap();
    assert_eq!(extraction.shared_string_count, 5);
    let en = extraction.translations.get("en").unwrap();
    assert_eq!(en.iter().collect::<Vec<_>>(), vec![("one", "one")]);
}

#[test]
fn test_literal_and_inline_cells() {
    let data = WorkbookBuilder::new()
        .raw_sheet(
            "s",
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>key</t></is></c><c r="B1" t="inlineStr"><is><t>default</t></is></c></row>
<row r="2"><c r="A2"><v>404</v></c><c r="B2" t="str"><f>CONCAT("Not ","found")</f><v>Not found</v></c></row>"#,
        )
        .build();

    let extraction = extract_bytes(&data, &ExtractOptions::default()).unwrap();
    assert_eq!(
        extraction.translations.get("en").unwrap().get("404"),
        Some("Not found")
    );
}

#[test]
fn test_sparse_rows_default_end() {
    let data = WorkbookBuilder::new()
        .sheet(
            "s",
            &[
                (1, &["key", "default"]),
                (2, &["a", "A"]),
                (10, &["b", "B"]),
                (40, &["c", "C"]),
            ],
        )
        .build();

    let extraction = extract_bytes(&data, &ExtractOptions::default()).unwrap();
    assert_eq!(extraction.row_count, 4);
    assert_eq!(extraction.translations.get("en").unwrap().len(), 3);
}

#[test]
fn test_header_scan_width() {
    let mut header = vec![""; 103];
    header[0] = "key";
    header[1] = "default";
    header[100] = "fr";
    header[102] = "es";
    let mut row = vec![""; 103];
    row[0] = "k";
    row[1] = "Text";
    row[100] = "Texte";
    row[102] = "Texto";

    let data = WorkbookBuilder::new()
        .sheet("wide", &[(1, header.as_slice()), (2, row.as_slice())])
        .build();

    let extraction = extract_bytes(&data, &ExtractOptions::default()).unwrap();
    assert_eq!(extraction.headers.len(), 101);
    assert!(extraction.headers[50].synthetic);
    assert_eq!(extraction.headers[50].name, "col_50");
    assert_eq!(
        extraction.translations.get("fr").unwrap().get("k"),
        Some("Texte")
    );
    assert!(extraction.translations.get("es").is_none());
}

#[test]
fn test_select_sheet_by_name() {
    let data = WorkbookBuilder::new()
        .sheet("app", &[(1, &["key", "default"]), (2, &["a", "App"])])
        .sheet("web", &[(1, &["key", "default"]), (2, &["a", "Web"])])
        .build();

    let extraction = extract_bytes(&data, &ExtractOptions::new().with_sheet("web")).unwrap();
    assert_eq!(extraction.sheet_name, "web");
    assert_eq!(
        extraction.translations.get("en").unwrap().get("a"),
        Some("Web")
    );
}

#[test]
fn test_unknown_sheet() {
    let err = extract_bytes(
        &language_workbook(),
        &ExtractOptions::new().with_sheet("server"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.to_string(), "Sheet 'server' not found. Available: app");
}

#[test]
fn test_empty_sheet() {
    let data = WorkbookBuilder::new().raw_sheet("empty", "").build();
    let err = extract_bytes(&data, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::EmptySheet));
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_not_a_workbook() {
    let err = extract_bytes(b"not a zip archive", &ExtractOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = extract_file(dir.path().join("missing.xlsx"), &ExtractOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_missing_default_column_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("language.xlsx");
    let output = dir.path().join("i18n.json");
    let data = WorkbookBuilder::new()
        .sheet("app", &[(1, &["key", "en"]), (2, &["a", "A"])])
        .build();
    fs::write(&input, data).unwrap();

    let err = convert_file(&input, &output, &ExtractOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingDefaultColumn(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(!output.exists());
}

#[test]
fn test_convert_file_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("language.xlsx");
    let output = dir.path().join("i18n.json");
    fs::write(&input, language_workbook()).unwrap();

    convert_file(&input, &output, &ExtractOptions::new().with_rows(2, Some(3))).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    let expected = r#"{
  "en": {
    "greeting": "Hello",
    "farewell": "Goodbye"
  },
  "zh-CN": {
    "greeting": "你好",
    "farewell": "再见"
  },
  "ja": {
    "greeting": "こんにちは"
  }
}"#;
    assert_eq!(written, expected);

    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(texts(&json, "ja"), vec!["greeting".to_string()]);
}

#[test]
fn test_conversion_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("language.xlsx");
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    fs::write(&input, language_workbook()).unwrap();

    convert_file(&input, &first, &ExtractOptions::default()).unwrap();
    convert_file(&input, &second, &ExtractOptions::default()).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_compact_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("language.xlsx");
    let output = dir.path().join("i18n.min.json");
    fs::write(&input, language_workbook()).unwrap();

    xlsx2i18n::convert_file_with_format(
        &input,
        &output,
        &ExtractOptions::new().with_rows(8, None),
        JsonFormat::Compact,
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        r#"{"en":{"ok":"OK"},"zh-CN":{"ok":"好"}}"#
    );
}
