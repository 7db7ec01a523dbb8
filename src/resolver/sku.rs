//! Lot identifier → SKU matching
//!
//! A lot such as `795-DBRL051525B-G11X` carries a nominal wavelength (`795`)
//! and a device-type code (`DBRL`). Catalog SKUs look like `795DBRL` or
//! `795DBRLITE`. A SKU qualifies when its wavelength is within the tolerance
//! and it contains the device-type code; among those the closest wavelength
//! wins, then the longer type code, then the shorter SKU.

use super::catalog::SkuCatalog;
use crate::error::DatasheetResult;
use regex::Regex;
use std::cmp::Ordering;
use tracing::{info, warn};

/// Default wavelength tolerance, nanometres.
pub const DEFAULT_TOLERANCE_NM: f64 = 5.0;

const LOT_PATTERN: &str = r"^([0-9]+(?:\.[0-9]+)?)-([A-Z]+)";
const SKU_WAVELENGTH_PATTERN: &str = r"^([0-9]+(?:\.[0-9]+)?)";
const SKU_TYPE_PATTERN: &str = r"[A-Z]+(?:LITE)?";

/// Wavelength and device type read from a lot identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct LotSpec {
    pub wavelength: f64,
    pub device_type: String,
}

/// A SKU that passed the wavelength and device-type filters.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchCandidate {
    pub sku: String,
    pub wavelength_diff: f64,
    pub specificity: usize,
}

impl MatchCandidate {
    /// Ranking order: closer wavelength, then more specific, then shorter.
    fn rank(&self, other: &Self) -> Ordering {
        self.wavelength_diff
            .total_cmp(&other.wavelength_diff)
            .then_with(|| other.specificity.cmp(&self.specificity))
            .then_with(|| self.sku.chars().count().cmp(&other.sku.chars().count()))
    }
}

/// The chosen SKU for a lot.
#[derive(Debug, Clone, PartialEq)]
pub struct SkuMatch {
    pub sku: String,
    pub wavelength_diff: f64,
    pub specificity: usize,
    /// How many SKUs qualified before ranking.
    pub candidates: usize,
}

#[derive(Debug, Clone)]
pub struct SkuMatcher {
    tolerance_nm: f64,
    lot_pattern: Regex,
    wavelength_pattern: Regex,
    type_pattern: Regex,
}

impl SkuMatcher {
    pub fn new(tolerance_nm: f64) -> DatasheetResult<Self> {
        Ok(Self {
            tolerance_nm,
            lot_pattern: Regex::new(LOT_PATTERN)?,
            wavelength_pattern: Regex::new(SKU_WAVELENGTH_PATTERN)?,
            type_pattern: Regex::new(SKU_TYPE_PATTERN)?,
        })
    }

    pub fn tolerance_nm(&self) -> f64 {
        self.tolerance_nm
    }

    /// Read `<wavelength>-<TYPE>` from the start of a lot identifier.
    pub fn parse_lot(&self, lot_id: &str) -> Option<LotSpec> {
        let caps = self.lot_pattern.captures(lot_id)?;
        let wavelength = caps[1].parse::<f64>().ok()?;
        Some(LotSpec {
            wavelength,
            device_type: caps[2].to_string(),
        })
    }

    /// Leading numeric wavelength of a SKU.
    pub fn sku_wavelength(&self, sku: &str) -> Option<f64> {
        let caps = self.wavelength_pattern.captures(sku)?;
        caps[1].parse::<f64>().ok()
    }

    /// Length of the first uppercase run (with an optional `LITE` tail).
    pub fn specificity(&self, sku: &str) -> usize {
        self.type_pattern
            .find(sku)
            .map(|m| m.as_str().chars().count())
            .unwrap_or(0)
    }

    /// Qualifying SKUs for `lot`, best first.
    pub fn candidates<'a, I>(&self, lot: &LotSpec, skus: I) -> Vec<MatchCandidate>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut candidates: Vec<MatchCandidate> = skus
            .into_iter()
            .filter_map(|sku| {
                let wavelength = self.sku_wavelength(sku)?;
                let wavelength_diff = (wavelength - lot.wavelength).abs();
                if wavelength_diff > self.tolerance_nm || !sku.contains(&lot.device_type) {
                    return None;
                }
                Some(MatchCandidate {
                    sku: sku.to_string(),
                    wavelength_diff,
                    specificity: self.specificity(sku),
                })
            })
            .collect();

        // stable: equal ranks keep catalog order
        candidates.sort_by(|a, b| a.rank(b));
        candidates
    }

    /// Best SKU for `lot_id` in `catalog`, if any.
    pub fn find(&self, lot_id: &str, catalog: &SkuCatalog) -> Option<SkuMatch> {
        self.find_in(lot_id, catalog.skus())
    }

    pub fn find_in<'a, I>(&self, lot_id: &str, skus: I) -> Option<SkuMatch>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some(lot) = self.parse_lot(lot_id) else {
            warn!(lot_id, "could not parse lot id for SKU lookup");
            return None;
        };

        let candidates = self.candidates(&lot, skus);
        let count = candidates.len();
        match candidates.into_iter().next() {
            Some(best) => {
                info!(
                    lot_id,
                    wavelength = lot.wavelength,
                    device_type = %lot.device_type,
                    sku = %best.sku,
                    candidates = count,
                    "found SKU"
                );
                Some(SkuMatch {
                    sku: best.sku,
                    wavelength_diff: best.wavelength_diff,
                    specificity: best.specificity,
                    candidates: count,
                })
            }
            None => {
                warn!(
                    lot_id,
                    wavelength = lot.wavelength,
                    device_type = %lot.device_type,
                    "no matching SKU"
                );
                None
            }
        }
    }
}
