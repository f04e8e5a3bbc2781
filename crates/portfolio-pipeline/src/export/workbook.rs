//! Minimal single-sheet XLSX writer.
//!
//! The package holds only the parts a spreadsheet reader needs: content
//! types, package and workbook relationships, the workbook, one worksheet
//! and a shared string table. Text cells go through the shared string table;
//! numbers and booleans are written inline. Characters XML 1.0 cannot carry
//! are written as `_xHHHH_` escapes, which spreadsheet readers decode.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::{Cursor, Write};

use portfolio_core::NormalizedProduct;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{flatten, Cell, EXPORT_COLUMNS};
use crate::error::ExportError;

pub const SHEET_NAME: &str = "Products";

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const DOC_REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PACKAGE_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/></Types>"#;

/// Writes `products` as an XLSX workbook with a single sheet named
/// [`SHEET_NAME`]. Row 1 is the header; empty input yields the header only.
///
/// # Errors
///
/// Returns [`ExportError`] if XML generation or archive packaging fails.
pub fn to_sheet(products: &[NormalizedProduct]) -> Result<Vec<u8>, ExportError> {
    let mut strings = SharedStrings::default();
    let sheet = worksheet_xml(products, &mut strings)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts: [(&str, Vec<u8>); 6] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("_rels/.rels", package_rels_xml()?),
        ("xl/workbook.xml", workbook_xml()?),
        ("xl/_rels/workbook.xml.rels", workbook_rels_xml()?),
        ("xl/worksheets/sheet1.xml", sheet),
        ("xl/sharedStrings.xml", strings.to_xml()?),
    ];
    for (name, body) in parts {
        zip.start_file(name, options)?;
        zip.write_all(&body)?;
    }

    Ok(zip.finish()?.into_inner())
}

#[derive(Default)]
struct SharedStrings {
    values: Vec<String>,
    index: HashMap<String, usize>,
    /// Cells pointing into the table, repeats included.
    references: usize,
}

impl SharedStrings {
    fn intern(&mut self, value: &str) -> usize {
        self.references += 1;
        if let Some(&idx) = self.index.get(value) {
            return idx;
        }
        let idx = self.values.len();
        self.values.push(value.to_string());
        self.index.insert(value.to_string(), idx);
        idx
    }

    fn to_xml(&self) -> Result<Vec<u8>, ExportError> {
        let mut writer = xml_writer()?;
        let count = self.references.to_string();
        let unique_count = self.values.len().to_string();
        writer.write_event(Event::Start(BytesStart::new("sst").with_attributes([
            ("xmlns", SPREADSHEET_NS),
            ("count", count.as_str()),
            ("uniqueCount", unique_count.as_str()),
        ])))?;
        for value in &self.values {
            writer.write_event(Event::Start(BytesStart::new("si")))?;
            writer.write_event(Event::Start(
                BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
            ))?;
            writer.write_event(Event::Text(BytesText::new(&xml_safe(value))))?;
            writer.write_event(Event::End(BytesEnd::new("t")))?;
            writer.write_event(Event::End(BytesEnd::new("si")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("sst")))?;
        Ok(writer.into_inner())
    }
}

/// Replaces characters XML 1.0 forbids with `_xHHHH_`. An underscore that
/// would itself read as an escape becomes `_x005F_`.
fn xml_safe(value: &str) -> Cow<'_, str> {
    let clean = value
        .char_indices()
        .all(|(i, ch)| !is_xml_forbidden(ch) && !(ch == '_' && looks_like_escape(&value[i..])));
    if clean {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for (i, ch) in value.char_indices() {
        if is_xml_forbidden(ch) {
            let _ = write!(out, "_x{:04X}_", u32::from(ch));
        } else if ch == '_' && looks_like_escape(&value[i..]) {
            out.push_str("_x005F_");
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

fn is_xml_forbidden(ch: char) -> bool {
    matches!(
        ch,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
    )
}

// `rest` starts at an underscore; true for `_xHHHH_`.
fn looks_like_escape(rest: &str) -> bool {
    let bytes = rest.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

fn xml_writer() -> Result<Writer<Vec<u8>>, ExportError> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(writer)
}

fn worksheet_xml(
    products: &[NormalizedProduct],
    strings: &mut SharedStrings,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)]),
    ))?;
    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    let header: Vec<Cell> = EXPORT_COLUMNS
        .iter()
        .map(|c| Cell::Text((*c).to_string()))
        .collect();
    write_row(&mut writer, strings, 1, &header)?;
    for (offset, product) in products.iter().enumerate() {
        write_row(&mut writer, strings, offset + 2, &flatten(product))?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner())
}

fn write_row(
    writer: &mut Writer<Vec<u8>>,
    strings: &mut SharedStrings,
    row: usize,
    cells: &[Cell],
) -> Result<(), ExportError> {
    let row_number = row.to_string();
    writer.write_event(Event::Start(
        BytesStart::new("row").with_attributes([("r", row_number.as_str())]),
    ))?;

    for (col, cell) in cells.iter().enumerate() {
        let reference = format!("{}{row}", column_name(col));
        let (kind, value) = match cell {
            Cell::Empty => continue,
            Cell::Text(s) => (Some("s"), strings.intern(s).to_string()),
            Cell::Number(n) => (None, n.to_string()),
            Cell::Bool(b) => (Some("b"), if *b { "1" } else { "0" }.to_string()),
        };

        let mut start = BytesStart::new("c").with_attributes([("r", reference.as_str())]);
        if let Some(kind) = kind {
            start.push_attribute(("t", kind));
        }
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Start(BytesStart::new("v")))?;
        writer.write_event(Event::Text(BytesText::new(&value)))?;
        writer.write_event(Event::End(BytesEnd::new("v")))?;
        writer.write_event(Event::End(BytesEnd::new("c")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

/// Zero-based column index to spreadsheet letters (`0 -> A`, `26 -> AA`).
fn column_name(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + u8::try_from(rem).unwrap_or(0));
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

fn workbook_xml() -> Result<Vec<u8>, ExportError> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(BytesStart::new("workbook").with_attributes([
        ("xmlns", SPREADSHEET_NS),
        ("xmlns:r", DOC_REL_NS),
    ])))?;
    writer.write_event(Event::Start(BytesStart::new("sheets")))?;
    writer.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
        ("name", SHEET_NAME),
        ("sheetId", "1"),
        ("r:id", "rId1"),
    ])))?;
    writer.write_event(Event::End(BytesEnd::new("sheets")))?;
    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner())
}

fn relationships_xml(relationships: &[(&str, &str, &str)]) -> Result<Vec<u8>, ExportError> {
    let mut writer = xml_writer()?;
    writer.write_event(Event::Start(
        BytesStart::new("Relationships").with_attributes([("xmlns", PACKAGE_REL_NS)]),
    ))?;
    for (id, kind, target) in relationships {
        writer.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", *id),
            ("Type", *kind),
            ("Target", *target),
        ])))?;
    }
    writer.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(writer.into_inner())
}

fn package_rels_xml() -> Result<Vec<u8>, ExportError> {
    relationships_xml(&[(
        "rId1",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument",
        "xl/workbook.xml",
    )])
}

fn workbook_rels_xml() -> Result<Vec<u8>, ExportError> {
    relationships_xml(&[
        (
            "rId1",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet",
            "worksheets/sheet1.xml",
        ),
        (
            "rId2",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings",
            "sharedStrings.xml",
        ),
    ])
}
