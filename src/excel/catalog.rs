//! SKU catalog importer - key sheet of the datasheet template → SkuCatalog

use super::{cell_text, header_names};
use crate::config::CatalogConfig;
use crate::error::{DatasheetError, DatasheetResult};
use crate::resolver::{CatalogEntry, SkuCatalog};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Reads the SKU column of one sheet in an .xlsx/.xlsm workbook.
pub struct CatalogImporter {
    path: PathBuf,
    sheet: String,
    column: String,
}

impl CatalogImporter {
    pub fn new<P: AsRef<Path>>(path: P, sheet: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet: sheet.into(),
            column: column.into(),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.path, config.sheet.clone(), config.column.clone())
    }

    /// Import the catalog, failing on any workbook or layout problem.
    pub fn import(&self) -> DatasheetResult<SkuCatalog> {
        let mut workbook = open_workbook_auto(&self.path).map_err(|e| {
            DatasheetError::Import(format!(
                "Failed to open catalog '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        let range = workbook.worksheet_range(&self.sheet).map_err(|e| {
            DatasheetError::Import(format!("Failed to read sheet '{}': {}", self.sheet, e))
        })?;

        let catalog = catalog_from_range(&range, &self.column)?;
        info!(
            path = %self.path.display(),
            entries = catalog.len(),
            "loaded SKU lookup table"
        );
        Ok(catalog)
    }

    /// Import the catalog, or fall back to an empty one.
    ///
    /// With an empty catalog every SKU lookup misses and the manifest is
    /// written with blank SKUs for manual completion.
    pub fn import_or_empty(&self) -> SkuCatalog {
        match self.import() {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!(error = %e, "could not load SKU lookup table, continuing without SKUs");
                SkuCatalog::empty()
            }
        }
    }
}

/// Build a catalog from a sheet whose first row is the header.
///
/// Rows without a SKU are skipped. Other non-empty cells go into the
/// entry's row keyed by header.
pub fn catalog_from_range(range: &Range<Data>, column: &str) -> DatasheetResult<SkuCatalog> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(SkuCatalog::empty());
    };

    let headers = header_names(header_row);
    let sku_col = headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| DatasheetError::Import(format!("Column '{}' not found in catalog sheet", column)))?;

    let mut catalog = SkuCatalog::empty();
    for row in rows {
        let Some(sku) = row.get(sku_col).and_then(cell_text) else {
            continue;
        };

        let mut entry = CatalogEntry::new(sku);
        for (idx, cell) in row.iter().enumerate() {
            if idx == sku_col {
                continue;
            }
            if let Some(text) = cell_text(cell) {
                entry.row.insert(headers[idx].clone(), text);
            }
        }
        catalog.push(entry);
    }

    Ok(catalog)
}
