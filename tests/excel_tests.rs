//! Excel import/export tests
//! Catalog import from a key sheet, manifest round trip, phrase report

use calamine::{open_workbook_auto, Data, Reader};
use laser_datasheet::excel::{
    read_manifest, write_manifest, write_phrase_report, CatalogImporter, ABOUT_SHEET,
    MANIFEST_HEADERS, REPORT_HEADERS, REPORT_SHEET,
};
use laser_datasheet::resolver::{SkuMatcher, DEFAULT_TOLERANCE_NM};
use laser_datasheet::staging::PhraseCount;
use laser_datasheet::{DatasheetError, DeviceRecord};
use pretty_assertions::assert_eq;
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;

fn write_key_sheet(path: &Path, sheet: &str, rows: &[&[&str]]) {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet).unwrap();
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(r as u32, c as u16, *value).unwrap();
            }
        }
    }
    workbook.save(path).unwrap();
}

fn record(lot: &str, dev: &str, sku: Option<&str>) -> DeviceRecord {
    DeviceRecord {
        lot_id: lot.to_string(),
        dev_num: dev.to_string(),
        serial: String::new(),
        sku: sku.map(str::to_string),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CATALOG IMPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_catalog_import_from_key_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("template.xlsx");
    write_key_sheet(
        &path,
        "Key",
        &[
            &["SKU", "Description"],
            &["790DBRL", "790nm DBR"],
            &["795DBRLITE", "795nm DBR lite"],
            &["", "spacer row"],
            &["800DBRL", ""],
        ],
    );

    let catalog = CatalogImporter::new(&path, "Key", "SKU").import().unwrap();
    assert_eq!(
        catalog.skus().collect::<Vec<_>>(),
        vec!["790DBRL", "795DBRLITE", "800DBRL"]
    );
    assert_eq!(
        catalog.get("795DBRLITE").unwrap().row.get("Description"),
        Some(&"795nm DBR lite".to_string())
    );

    let matcher = SkuMatcher::new(DEFAULT_TOLERANCE_NM).unwrap();
    let found = matcher.find("795-DBRL051525B-G11X", &catalog).unwrap();
    assert_eq!(found.sku, "795DBRLITE");
}

#[test]
fn test_catalog_import_wrong_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("template.xlsx");
    write_key_sheet(&path, "snl", &[&["SKU"], &["795DBRL"]]);

    let importer = CatalogImporter::new(&path, "Key", "SKU");
    assert!(importer.import().is_err());
    assert!(importer.import_or_empty().is_empty());
}

#[test]
fn test_catalog_import_missing_column_degrades() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("template.xlsx");
    write_key_sheet(&path, "Key", &[&["Part"], &["795DBRL"]]);

    let importer = CatalogImporter::new(&path, "Key", "SKU");
    assert!(importer.import().is_err());
    assert!(importer.import_or_empty().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// MANIFEST
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_manifest_round_trip_applies_serial_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Devices.xlsx");

    let records = vec![
        record("795-DBRL051525B-G11X", "37-131", Some("795DBRLITE")),
        record("852-DBRL051723C-G2X", "25-79", None),
    ];
    write_manifest(&path, "Devices", &records).unwrap();
    assert!(path.exists());

    let read = read_manifest(&path, "Devices").unwrap();
    // rows without SKU are not ready for datasheet generation
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].lot_id, "795-DBRL051525B-G11X");
    assert_eq!(read[0].serial, "37-131");
    assert_eq!(read[0].document_name(), "37-131 795DBRLITE 37-131.docx");
}

#[test]
fn test_manifest_with_operator_edits() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Devices.xlsx");

    // what the sheet looks like after the operator fills SN and SKU
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Devices").unwrap();
    for (col, header) in MANIFEST_HEADERS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    worksheet.write_string(1, 0, "852-DBRL051723C-G2X").unwrap();
    worksheet.write_string(1, 1, "25-79").unwrap();
    worksheet.write_number(1, 2, 20451.0).unwrap();
    worksheet.write_string(1, 3, "852DBRL").unwrap();
    workbook.save(&path).unwrap();

    let read = read_manifest(&path, "Devices").unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].serial, "20451");
    assert_eq!(read[0].document_name(), "20451 852DBRL 25-79.docx");
}

#[test]
fn test_manifest_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("Devices.xlsx");
    write_manifest(&path, "Devices", &[]).unwrap();
    assert!(read_manifest(&path, "Devices").unwrap().is_empty());
}

#[test]
fn test_read_manifest_missing_file() {
    assert!(read_manifest(Path::new("missing/Devices.xlsx"), "Devices").is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// PHRASE REPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_phrase_report_written() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("PhraseCounts.xlsx");
    let counts = vec![PhraseCount {
        filename: "852-DBRL-G2X-25-79_LIV_vs_Temp.txt".to_string(),
        keyword: "LIV_vs_Temp".to_string(),
        phrase: "LIV Sweep vs Temperature".to_string(),
        count: 2,
        trimmed_from: Some(40),
    }];

    write_phrase_report(&path, &counts).unwrap();
    assert!(path.exists());
}

#[test]
fn test_phrase_report_sheet_is_a_plain_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("PhraseCounts.xlsx");
    let counts: Vec<PhraseCount> = ["LIV_vs_Temp", "WLT_Wave"]
        .iter()
        .map(|keyword| PhraseCount {
            filename: format!("852-DBRL-G2X-25-79_{}.txt", keyword),
            keyword: keyword.to_string(),
            phrase: "header".to_string(),
            count: 1,
            trimmed_from: None,
        })
        .collect();

    write_phrase_report(&path, &counts).unwrap();

    let mut workbook = open_workbook_auto(&path).unwrap();
    let table = workbook.worksheet_range(REPORT_SHEET).unwrap();
    let rows: Vec<Vec<String>> = table
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            REPORT_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
            vec![
                "852-DBRL-G2X-25-79_LIV_vs_Temp.txt".to_string(),
                "LIV_vs_Temp".to_string(),
                "header".to_string(),
                "1".to_string(),
            ],
            vec![
                "852-DBRL-G2X-25-79_WLT_Wave.txt".to_string(),
                "WLT_Wave".to_string(),
                "header".to_string(),
                "1".to_string(),
            ],
        ]
    );

    let about = workbook.worksheet_range(ABOUT_SHEET).unwrap();
    match about.get_value((0, 0)) {
        Some(Data::String(text)) => assert!(text.starts_with("Generated ")),
        other => panic!("unexpected about cell: {other:?}"),
    }
}

#[test]
fn test_phrase_report_unwritable_path_is_export_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("PhraseCounts.xlsx");
    let result = write_phrase_report(&path, &[]);
    assert!(matches!(result, Err(DatasheetError::Export(_))));
}
