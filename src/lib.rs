//! Laser-diode datasheet intake
//!
//! This library sorts raw test-station files, resolves the device identity
//! encoded in each measurement filename, matches the lot to a product SKU,
//! and writes the device manifest consumed by the datasheet generators.
//!
//! # Example
//!
//! ```
//! use laser_datasheet::resolver::{DeviceResolver, SkuCatalog, DEFAULT_TOLERANCE_NM};
//!
//! let catalog = SkuCatalog::from_skus(["790DBRL", "795DBRLITE", "800DBRL"]);
//! let resolver = DeviceResolver::new(catalog, DEFAULT_TOLERANCE_NM)?;
//!
//! let (device, sku) =
//!     resolver.resolve("795-DBRL051525B-G11X_DryEtch-37-131_0.0900A_LIV_vs_Temp.jpg")?;
//! assert_eq!(device.lot_id, "795-DBRL051525B-G11X");
//! assert_eq!(device.dev_num, "37-131");
//! assert_eq!(sku.map(|m| m.sku).as_deref(), Some("795DBRLITE"));
//! # Ok::<(), laser_datasheet::error::DatasheetError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod excel;
pub mod resolver;
pub mod staging;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{DatasheetError, DatasheetResult};
pub use types::{DeviceIdentity, DeviceRecord, MeasurementKind};
