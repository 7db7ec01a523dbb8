//! Raw-file staging
//!
//! Everything that touches the station folders: copying and sorting raw
//! files, repairing text files with repeated headers, and finding a
//! device's measurement file.

mod repair;
mod sorter;

pub use repair::{repair_text, repair_text_files, PhraseCount, RepairReport};
pub use sorter::{categorize, sort_raw_files, FileCategory, SortReport};

use crate::error::DatasheetResult;
use crate::types::{DeviceIdentity, MeasurementKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Names of the regular files in `dir`, sorted.
///
/// With `extension` set only names ending in it are returned. Names that
/// are not valid UTF-8 are skipped with a warning.
pub fn list_files(dir: &Path, extension: Option<&str>) -> DatasheetResult<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(name = ?raw, "skipping file with non UTF-8 name");
                continue;
            }
        };
        if extension.map_or(true, |ext| name.ends_with(ext)) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// First file in `dir` whose name carries the device and measurement keyword.
pub fn locate_measurement(
    dir: &Path,
    identity: &DeviceIdentity,
    kind: MeasurementKind,
) -> DatasheetResult<Option<PathBuf>> {
    let found = list_files(dir, None)?.into_iter().find(|name| {
        name.contains(&identity.lot_id)
            && name.contains(&identity.dev_num)
            && name.contains(kind.keyword())
    });
    Ok(found.map(|name| dir.join(name)))
}
