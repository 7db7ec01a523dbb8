use super::list_files;
use crate::config::Config;
use crate::error::{DatasheetError, DatasheetResult};
use crate::types::MeasurementKind;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Where a raw file ends up in the output folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// `.jpg` LIV-vs-temperature plot → `LIV/`
    Liv,
    /// `.jpg` SMSR-vs-temperature plot → `SMSR/`
    Smsr,
    /// `.txt` measurement data → `Other/`
    Text,
    /// Anything else stays in the output root
    Unsorted,
}

pub fn categorize(filename: &str) -> FileCategory {
    if filename.ends_with(".jpg") {
        if filename.contains(MeasurementKind::LivVsTemp.keyword()) {
            FileCategory::Liv
        } else if filename.contains(MeasurementKind::SmsrVsTemp.keyword()) {
            FileCategory::Smsr
        } else {
            FileCategory::Unsorted
        }
    } else if filename.ends_with(".txt") {
        FileCategory::Text
    } else {
        FileCategory::Unsorted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortReport {
    pub liv: usize,
    pub smsr: usize,
    pub text: usize,
    pub unsorted: usize,
    /// (filename, error) for files that could not be copied or moved
    pub failures: Vec<(String, String)>,
}

impl SortReport {
    pub fn total(&self) -> usize {
        self.liv + self.smsr + self.text + self.unsorted
    }

    fn record(&mut self, category: FileCategory) {
        match category {
            FileCategory::Liv => self.liv += 1,
            FileCategory::Smsr => self.smsr += 1,
            FileCategory::Text => self.text += 1,
            FileCategory::Unsorted => self.unsorted += 1,
        }
    }
}

/// Copy every raw file into the output folder and sort it by category.
///
/// Existing files with the same name are overwritten. A file that fails to
/// copy or move is recorded and the rest of the batch continues.
pub fn sort_raw_files(config: &Config) -> DatasheetResult<SortReport> {
    if !config.source_dir.is_dir() {
        return Err(DatasheetError::Config(format!(
            "source folder '{}' does not exist",
            config.source_dir.display()
        )));
    }

    // copying a folder onto itself truncates every file
    if same_path(&config.source_dir, &config.output_dir)? {
        return Err(DatasheetError::Config(format!(
            "source folder '{}' is also the output folder",
            config.source_dir.display()
        )));
    }

    for dir in [config.liv_dir(), config.smsr_dir(), config.other_dir()] {
        fs::create_dir_all(&dir)?;
    }

    let mut report = SortReport::default();
    for name in list_files(&config.source_dir, None)? {
        let category = categorize(&name);
        match stage_file(config, &name, category) {
            Ok(()) => {
                debug!(filename = %name, ?category, "staged file");
                report.record(category);
            }
            Err(e) => {
                warn!(filename = %name, error = %e, "failed to stage file");
                report.failures.push((name, e.to_string()));
            }
        }
    }

    info!(
        total = report.total(),
        liv = report.liv,
        smsr = report.smsr,
        text = report.text,
        failures = report.failures.len(),
        "raw files copied and organized"
    );
    Ok(report)
}

fn stage_file(config: &Config, name: &str, category: FileCategory) -> DatasheetResult<()> {
    let original = config.source_dir.join(name);
    let copied = config.output_dir.join(name);
    if same_path(&original, &copied)? {
        return Err(DatasheetError::Config(format!(
            "'{}' and '{}' are the same file",
            original.display(),
            copied.display()
        )));
    }
    fs::copy(&original, &copied)?;

    let target_dir = match category {
        FileCategory::Liv => config.liv_dir(),
        FileCategory::Smsr => config.smsr_dir(),
        FileCategory::Text => config.other_dir(),
        FileCategory::Unsorted => return Ok(()),
    };
    move_file(&copied, &target_dir.join(name))
}

fn same_path(a: &Path, b: &Path) -> DatasheetResult<bool> {
    if !b.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

fn move_file(from: &Path, to: &Path) -> DatasheetResult<()> {
    if fs::rename(from, to).is_err() {
        // rename can fail across volumes or onto an existing file on some
        // platforms
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize() {
        assert_eq!(categorize("a-G2X-1-2_0.1A_LIV_vs_Temp.jpg"), FileCategory::Liv);
        assert_eq!(categorize("a-G2X-1-2_0.1A_Wave-SMSR_vs_Temp.jpg"), FileCategory::Smsr);
        assert_eq!(categorize("a-G2X-1-2_0.1A_SpecWidth.jpg"), FileCategory::Unsorted);
        assert_eq!(categorize("a-G2X-1-2_0.1A_LIV_vs_Temp.txt"), FileCategory::Text);
        assert_eq!(categorize("summary.csv"), FileCategory::Unsorted);
    }

    #[test]
    fn test_categorize_is_case_sensitive() {
        assert_eq!(categorize("a_LIV_vs_Temp.JPG"), FileCategory::Unsorted);
    }

    #[test]
    fn test_same_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "data").unwrap();

        assert!(same_path(&file, &dir.path().join(".").join("a.txt")).unwrap());
        assert!(!same_path(&file, &dir.path().join("b.txt")).unwrap());
    }

    #[test]
    fn test_report_total() {
        let mut report = SortReport::default();
        report.record(FileCategory::Liv);
        report.record(FileCategory::Text);
        report.record(FileCategory::Text);
        assert_eq!(report.total(), 3);
        assert_eq!(report.text, 2);
    }
}
