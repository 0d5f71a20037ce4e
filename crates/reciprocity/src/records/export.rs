use super::domain::AssessmentRow;

/// Column layout shared by the CSV and XLSX exports. Matches the stored
/// table shape so a dump can be re-imported without remapping.
pub const EXPORT_COLUMNS: [&str; 15] = [
    "id",
    "user_id",
    "subject_name",
    "timestamp",
    "TP",
    "BI",
    "OE",
    "LC",
    "SC",
    "PS",
    "IOS",
    "EOS",
    "CLASSIFICATION",
    "CONFIDENCE",
    "raw_json",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("xlsx export is not enabled in this build")]
    XlsxDisabled,
    #[error("could not assemble export: {0}")]
    Encode(String),
}

/// Serializes rows as CSV with the shared column layout.
pub fn csv_bytes(rows: &[AssessmentRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS).map_err(encode_error)?;
    for row in rows {
        writer.write_record(row_fields(row)).map_err(encode_error)?;
    }
    writer.into_inner().map_err(encode_error)
}

/// Writes rows as a minimal SpreadsheetML workbook: a zip container with
/// the content-types part, the relationship parts, one workbook, and one
/// inline-string worksheet.
#[cfg(feature = "xlsx")]
pub fn xlsx_bytes(rows: &[AssessmentRow]) -> Result<Vec<u8>, ExportError> {
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let parts: [(&str, String); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
        ("_rels/.rels", ROOT_RELS_XML.to_string()),
        ("xl/workbook.xml", WORKBOOK_XML.to_string()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML.to_string()),
        ("xl/worksheets/sheet1.xml", worksheet_xml(rows)),
    ];

    for (name, content) in parts {
        archive.start_file(name, options).map_err(encode_error)?;
        archive
            .write_all(content.as_bytes())
            .map_err(encode_error)?;
    }

    let cursor = archive.finish().map_err(encode_error)?;
    Ok(cursor.into_inner())
}

#[cfg(not(feature = "xlsx"))]
pub fn xlsx_bytes(_rows: &[AssessmentRow]) -> Result<Vec<u8>, ExportError> {
    Err(ExportError::XlsxDisabled)
}

fn encode_error<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Encode(err.to_string())
}

fn row_fields(row: &AssessmentRow) -> [String; 15] {
    let scores = &row.scores;
    [
        row.id.to_string(),
        row.user_id.to_string(),
        row.subject_name.clone(),
        row.timestamp.clone(),
        scores.inputs.tp.to_string(),
        scores.inputs.bi.to_string(),
        scores.inputs.oe.to_string(),
        scores.inputs.lc.to_string(),
        scores.inputs.sc.to_string(),
        scores.inputs.ps.to_string(),
        scores.ios.to_string(),
        scores.eos.to_string(),
        scores.classification.label().to_string(),
        scores.confidence.to_string(),
        row.raw_json.clone(),
    ]
}

/// Which export columns carry numbers; the rest are inline strings.
#[cfg(feature = "xlsx")]
const NUMERIC_COLUMNS: [bool; 15] = [
    true, true, false, false, true, true, true, true, true, true, true, true, false, true, false,
];

#[cfg(feature = "xlsx")]
fn worksheet_xml(rows: &[AssessmentRow]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
         <sheetData>",
    );

    body.push_str("<row>");
    for column in EXPORT_COLUMNS {
        push_text_cell(&mut body, column);
    }
    body.push_str("</row>");

    for row in rows {
        body.push_str("<row>");
        for (index, field) in row_fields(row).iter().enumerate() {
            if NUMERIC_COLUMNS[index] {
                body.push_str("<c t=\"n\"><v>");
                body.push_str(field);
                body.push_str("</v></c>");
            } else {
                push_text_cell(&mut body, field);
            }
        }
        body.push_str("</row>");
    }

    body.push_str("</sheetData></worksheet>");
    body
}

#[cfg(feature = "xlsx")]
fn push_text_cell(body: &mut String, value: &str) {
    body.push_str("<c t=\"inlineStr\"><is><t>");
    body.push_str(&xml_escape(value));
    body.push_str("</t></is></c>");
}

#[cfg(feature = "xlsx")]
fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(feature = "xlsx")]
const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

#[cfg(feature = "xlsx")]
const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

#[cfg(feature = "xlsx")]
const WORKBOOK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Assessments" sheetId="1" r:id="rId1"/></sheets></workbook>"#;

#[cfg(feature = "xlsx")]
const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;
