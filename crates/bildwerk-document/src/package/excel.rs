// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XLSX workbook — one sheet, two cells: a header label in A1 and the image's
// data URL as text in A2.
//
// The image is not embedded as a drawing; it travels as cell text. Cells use
// inline strings, so the package needs no shared-strings or styles part.

use std::io::{Cursor, Write};

use bildwerk_core::error::{BildwerkError, Result};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{SourceImage, escape_markup};

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Build the `.xlsx` bytes.
pub fn build_workbook(source: &SourceImage, sheet_name: &str, header_label: &str) -> Result<Vec<u8>> {
    let data_url = source.data_url()?;

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", content_types()),
        ("_rels/.rels", root_rels()),
        ("xl/workbook.xml", workbook(sheet_name)),
        ("xl/_rels/workbook.xml.rels", workbook_rels()),
        ("xl/worksheets/sheet1.xml", worksheet(header_label, &data_url)),
    ];

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in &parts {
        writer
            .start_file(*name, options)
            .map_err(|err| BildwerkError::Package(format!("failed to add {name}: {err}")))?;
        writer
            .write_all(body.as_bytes())
            .map_err(|err| BildwerkError::Package(format!("failed to write {name}: {err}")))?;
    }
    let cursor = writer
        .finish()
        .map_err(|err| BildwerkError::Package(format!("failed to finish workbook: {err}")))?;
    let bytes = cursor.into_inner();

    debug!(parts = parts.len(), bytes = bytes.len(), "Workbook assembled");
    Ok(bytes)
}

fn content_types() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
            r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
            r#"<Default Extension="xml" ContentType="application/xml"/>"#,
            r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
            r#"<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            "</Types>",
        ),
        decl = XML_DECL,
    )
}

fn root_rels() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="{rel}/officeDocument" Target="xl/workbook.xml"/>"#,
            "</Relationships>",
        ),
        decl = XML_DECL,
        ns = NS_PKG_REL,
        rel = NS_REL,
    )
}

fn workbook(sheet_name: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<workbook xmlns="{main}" xmlns:r="{rel}">"#,
            r#"<sheets><sheet name="{name}" sheetId="1" r:id="rId1"/></sheets>"#,
            "</workbook>",
        ),
        decl = XML_DECL,
        main = NS_MAIN,
        rel = NS_REL,
        name = escape_markup(sheet_name),
    )
}

fn workbook_rels() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<Relationships xmlns="{ns}">"#,
            r#"<Relationship Id="rId1" Type="{rel}/worksheet" Target="worksheets/sheet1.xml"/>"#,
            "</Relationships>",
        ),
        decl = XML_DECL,
        ns = NS_PKG_REL,
        rel = NS_REL,
    )
}

fn worksheet(header_label: &str, data_url: &str) -> String {
    format!(
        concat!(
            "{decl}",
            r#"<worksheet xmlns="{main}">"#,
            r#"<dimension ref="A1:A2"/>"#,
            "<sheetData>",
            r#"<row r="1"><c r="A1" t="inlineStr"><is><t>{header}</t></is></c></row>"#,
            r#"<row r="2"><c r="A2" t="inlineStr"><is><t>{data}</t></is></c></row>"#,
            "</sheetData>",
            "</worksheet>",
        ),
        decl = XML_DECL,
        main = NS_MAIN,
        header = escape_markup(header_label),
        data = escape_markup(data_url),
    )
}
