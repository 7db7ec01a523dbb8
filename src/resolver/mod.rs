//! Device identity resolution
//!
//! Two pure steps over in-memory strings:
//! - [`FilenameParser`]: measurement filename → (lot_id, dev_num)
//! - [`SkuMatcher`]: lot_id + [`SkuCatalog`] → best SKU, if any
//!
//! [`DeviceResolver`] bundles both with a loaded catalog.

pub mod catalog;
pub mod filename;
pub mod sku;

pub use catalog::{CatalogEntry, SkuCatalog};
pub use filename::{strip_measurement_tokens, FilenameParser, NamingRule};
pub use sku::{LotSpec, MatchCandidate, SkuMatch, SkuMatcher, DEFAULT_TOLERANCE_NM};

use crate::error::DatasheetResult;
use crate::types::DeviceIdentity;

/// Parser, matcher and catalog for one run. Immutable once built.
#[derive(Debug, Clone)]
pub struct DeviceResolver {
    parser: FilenameParser,
    matcher: SkuMatcher,
    catalog: SkuCatalog,
}

impl DeviceResolver {
    pub fn new(catalog: SkuCatalog, tolerance_nm: f64) -> DatasheetResult<Self> {
        Ok(Self {
            parser: FilenameParser::new()?,
            matcher: SkuMatcher::new(tolerance_nm)?,
            catalog,
        })
    }

    pub fn catalog(&self) -> &SkuCatalog {
        &self.catalog
    }

    pub fn identify(&self, filename: &str) -> DatasheetResult<DeviceIdentity> {
        self.parser.parse(filename)
    }

    pub fn match_sku(&self, lot_id: &str) -> Option<SkuMatch> {
        self.matcher.find(lot_id, &self.catalog)
    }

    /// Identity plus SKU for one filename. Only the identity can fail.
    pub fn resolve(&self, filename: &str) -> DatasheetResult<(DeviceIdentity, Option<SkuMatch>)> {
        let identity = self.identify(filename)?;
        let sku = self.match_sku(&identity.lot_id);
        Ok((identity, sku))
    }
}
