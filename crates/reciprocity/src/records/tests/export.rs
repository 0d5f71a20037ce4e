use super::common::*;
use crate::assessment::score;
use crate::records::domain::AssessmentRow;
use crate::records::export::{csv_bytes, xlsx_bytes, EXPORT_COLUMNS};

fn sample_row() -> AssessmentRow {
    AssessmentRow {
        id: 7,
        user_id: 3,
        subject_name: "R&D \"Lead\" Example".to_string(),
        timestamp: "2026-02-03T04:05:06+00:00".to_string(),
        scores: score(&sample_aggregates()),
        raw_json: "{\"schema_version\":1}".to_string(),
    }
}

#[test]
fn csv_uses_the_shared_column_layout() {
    let bytes = csv_bytes(&[sample_row()]).expect("csv");

    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let headers = reader.headers().expect("headers").clone();
    let columns: Vec<&str> = headers.iter().collect();
    assert_eq!(columns, EXPORT_COLUMNS);

    let record = reader
        .records()
        .next()
        .expect("one record")
        .expect("valid record");
    assert_eq!(&record[0], "7");
    assert_eq!(&record[2], "R&D \"Lead\" Example");
    assert_eq!(&record[4], "80");
    assert_eq!(&record[10], "68.5");
    assert_eq!(&record[12], "Mixed / Needs deeper assessment");
    assert_eq!(&record[13], "64.5");
    assert_eq!(&record[14], "{\"schema_version\":1}");
}

#[test]
fn csv_of_no_rows_is_just_the_header() {
    let bytes = csv_bytes(&[]).expect("csv");
    let text = String::from_utf8(bytes).expect("utf-8");
    assert_eq!(text.lines().count(), 1);
}

#[cfg(feature = "xlsx")]
#[test]
fn xlsx_archive_carries_the_expected_parts() {
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    let bytes = xlsx_bytes(&[sample_row()]).expect("xlsx");
    assert_eq!(&bytes[..2], b"PK");

    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("zip opens");
    for part in [
        "[Content_Types].xml",
        "_rels/.rels",
        "xl/workbook.xml",
        "xl/_rels/workbook.xml.rels",
        "xl/worksheets/sheet1.xml",
    ] {
        assert!(archive.by_name(part).is_ok(), "missing part {part}");
    }

    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .expect("worksheet")
        .read_to_string(&mut sheet)
        .expect("worksheet xml");
    assert!(sheet.contains("<t>subject_name</t>"));
    assert!(sheet.contains("R&amp;D &quot;Lead&quot; Example"));
    assert!(sheet.contains("<c t=\"n\"><v>68.5</v></c>"));
}

#[cfg(not(feature = "xlsx"))]
#[test]
fn xlsx_reports_disabled_when_the_feature_is_off() {
    use crate::records::export::ExportError;

    let result = xlsx_bytes(&[sample_row()]);
    assert!(matches!(result, Err(ExportError::XlsxDisabled)));
}
