//! Device manifest (Devices.xlsx)
//!
//! One row per unique device found in the LIV folder:
//! `Lot_ID | Dev# | SN | SKU`. SN is left blank for the operator; SKU is
//! blank when no catalog entry matched.

use super::{cell_text, header_names};
use crate::error::{DatasheetError, DatasheetResult};
use crate::resolver::DeviceResolver;
use crate::staging::list_files;
use crate::types::{DeviceIdentity, DeviceRecord};
use calamine::{open_workbook_auto, Data, Range, Reader};
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

pub const MANIFEST_HEADERS: [&str; 4] = ["Lot_ID", "Dev#", "SN", "SKU"];

/// Outcome of scanning a folder for devices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestBuild {
    /// Unique devices in first-seen order
    pub records: Vec<DeviceRecord>,
    /// Filenames no naming rule could parse
    pub skipped: Vec<String>,
    /// Files that repeated an already-seen device
    pub duplicates: usize,
}

impl ManifestBuild {
    pub fn without_sku(&self) -> usize {
        self.records.iter().filter(|r| r.sku.is_none()).count()
    }
}

/// Scan `liv_dir` for `.jpg` files and resolve one record per device.
pub fn build_manifest(liv_dir: &Path, resolver: &DeviceResolver) -> DatasheetResult<ManifestBuild> {
    let names = list_files(liv_dir, Some(".jpg"))?;
    Ok(build_manifest_from_names(names, resolver))
}

/// Resolve one record per unique device among `filenames`.
pub fn build_manifest_from_names<I, S>(filenames: I, resolver: &DeviceResolver) -> ManifestBuild
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut build = ManifestBuild::default();
    let mut seen: HashSet<DeviceIdentity> = HashSet::new();

    for name in filenames {
        let name = name.as_ref();
        let identity = match resolver.identify(name) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(filename = name, error = %e, "could not parse filename");
                build.skipped.push(name.to_string());
                continue;
            }
        };

        if !seen.insert(identity.clone()) {
            build.duplicates += 1;
            continue;
        }

        let sku = resolver.match_sku(&identity.lot_id).map(|m| m.sku);
        info!(
            filename = name,
            lot_id = %identity.lot_id,
            dev_num = %identity.dev_num,
            sku = sku.as_deref().unwrap_or(""),
            "parsed device"
        );
        build.records.push(DeviceRecord::new(identity, sku));
    }

    build
}

/// Write the manifest workbook.
pub fn write_manifest(path: &Path, sheet: &str, records: &[DeviceRecord]) -> DatasheetResult<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet)
        .map_err(|e| DatasheetError::Export(format!("Failed to set worksheet name: {}", e)))?;

    worksheet.set_column_width(0, 26).ok();
    worksheet.set_column_width(1, 12).ok();
    worksheet.set_column_width(2, 12).ok();
    worksheet.set_column_width(3, 16).ok();

    let header_format = Format::new().set_bold();
    for (col, header) in MANIFEST_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| DatasheetError::Export(e.to_string()))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        let cells = [
            record.lot_id.as_str(),
            record.dev_num.as_str(),
            record.serial.as_str(),
            record.sku.as_deref().unwrap_or(""),
        ];
        for (col, value) in cells.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string(row, col as u16, *value)
                .map_err(|e| DatasheetError::Export(e.to_string()))?;
        }
    }

    workbook
        .save(path)
        .map_err(|e| DatasheetError::Export(format!("Failed to save manifest: {}", e)))?;

    Ok(())
}

/// Read the manifest back for datasheet generation.
///
/// Rows missing a lot, device number or SKU are dropped. A blank SN falls
/// back to the device number.
pub fn read_manifest(path: &Path, sheet: &str) -> DatasheetResult<Vec<DeviceRecord>> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        DatasheetError::Import(format!("Failed to open manifest '{}': {}", path.display(), e))
    })?;
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|e| DatasheetError::Import(format!("Failed to read sheet '{}': {}", sheet, e)))?;
    records_from_range(&range)
}

pub fn records_from_range(range: &Range<Data>) -> DatasheetResult<Vec<DeviceRecord>> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };

    let headers = header_names(header_row);
    let column = |name: &str| headers.iter().position(|h| h == name);
    let missing = |name: &str| DatasheetError::Import(format!("Manifest has no '{}' column", name));

    let lot_col = column("Lot_ID").ok_or_else(|| missing("Lot_ID"))?;
    let dev_col = column("Dev#").ok_or_else(|| missing("Dev#"))?;
    let sku_col = column("SKU").ok_or_else(|| missing("SKU"))?;
    let sn_col = column("SN");

    let text_at = |row: &[Data], col: usize| row.get(col).and_then(cell_text);

    let mut records = Vec::new();
    for row in rows {
        let (Some(lot_id), Some(dev_num), Some(sku)) =
            (text_at(row, lot_col), text_at(row, dev_col), text_at(row, sku_col))
        else {
            continue;
        };

        let serial = sn_col
            .and_then(|col| text_at(row, col))
            .unwrap_or_else(|| dev_num.clone());

        records.push(DeviceRecord {
            lot_id,
            dev_num,
            serial,
            sku: Some(sku),
        });
    }

    Ok(records)
}
