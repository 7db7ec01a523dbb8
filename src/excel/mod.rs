//! Excel import/export
//!
//! - Import: SKU catalog from the template's key sheet, device manifest
//! - Export: device manifest, phrase-count report

mod catalog;
mod manifest;
mod report;

pub use catalog::{catalog_from_range, CatalogImporter};
pub use manifest::{
    build_manifest, build_manifest_from_names, read_manifest, records_from_range, write_manifest,
    ManifestBuild, MANIFEST_HEADERS,
};
pub use report::{write_phrase_report, ABOUT_SHEET, REPORT_HEADERS, REPORT_SHEET};

use calamine::Data;

/// Cell as trimmed text. Empty, blank and error cells are `None`.
///
/// Whole floats print without a fraction, so a serial typed as `1234`
/// reads back as `"1234"`, not `"1234.0"`.
pub(crate) fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string().trim().to_string(),
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Header row as column names; unnamed columns become `col_<n>`.
pub(crate) fn header_names(row: &[Data]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(idx, cell)| cell_text(cell).unwrap_or_else(|| format!("col_{}", idx)))
        .collect()
}
