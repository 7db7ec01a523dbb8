use serde::{Deserialize, Serialize};

//==============================================================================
// Device identity
//==============================================================================

/// A device as encoded in a measurement filename.
///
/// Two measurement files belong to the same device exactly when their
/// identities are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Fabrication lot and wafer region, e.g. `795-DBRL051525B-G11X`
    pub lot_id: String,
    /// Die within the lot, e.g. `37-131`
    pub dev_num: String,
}

impl DeviceIdentity {
    pub fn new(lot_id: impl Into<String>, dev_num: impl Into<String>) -> Self {
        Self {
            lot_id: lot_id.into(),
            dev_num: dev_num.into(),
        }
    }
}

//==============================================================================
// Measurement kinds
//==============================================================================

/// Measurement types the test station produces, keyed by filename keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    LivVsTemp,
    SmsrVsTemp,
    SpecWidth,
    WltSmsr,
    WltWave,
}

impl MeasurementKind {
    /// The three text files a datasheet is built from.
    pub const DATASHEET_INPUTS: [MeasurementKind; 3] = [
        MeasurementKind::WltWave,
        MeasurementKind::WltSmsr,
        MeasurementKind::LivVsTemp,
    ];

    /// Keyword that appears in the filename of this measurement.
    pub fn keyword(self) -> &'static str {
        match self {
            MeasurementKind::LivVsTemp => "LIV_vs_Temp",
            MeasurementKind::SmsrVsTemp => "SMSR_vs_Temp",
            MeasurementKind::SpecWidth => "SpecWidth",
            MeasurementKind::WltSmsr => "WLT_SMSR",
            MeasurementKind::WltWave => "WLT_Wave",
        }
    }
}

//==============================================================================
// Manifest rows
//==============================================================================

/// One row of the device manifest handed to the datasheet generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceRecord {
    pub lot_id: String,
    pub dev_num: String,
    /// Serial number. Blank in a freshly built manifest; filled in by hand.
    pub serial: String,
    /// Matched SKU. `None` means the row needs a manual SKU.
    pub sku: Option<String>,
}

impl DeviceRecord {
    pub fn new(identity: DeviceIdentity, sku: Option<String>) -> Self {
        Self {
            lot_id: identity.lot_id,
            dev_num: identity.dev_num,
            serial: String::new(),
            sku,
        }
    }

    pub fn identity(&self) -> DeviceIdentity {
        DeviceIdentity::new(self.lot_id.clone(), self.dev_num.clone())
    }

    /// File name of the datasheet generated for this device.
    pub fn document_name(&self) -> String {
        format!(
            "{} {} {}.docx",
            self.serial,
            self.sku.as_deref().unwrap_or(""),
            self.dev_num
        )
    }
}
