//! Run configuration
//!
//! Loaded from an optional YAML file. Every field has a default matching the
//! station's folder layout, so an empty file (or none at all) is valid.
//! Relative paths are resolved against the directory of the config file.

use crate::error::{DatasheetError, DatasheetResult};
use crate::resolver::DEFAULT_TOLERANCE_NM;
use crate::types::MeasurementKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the test station drops raw files
    pub source_dir: PathBuf,
    /// Where sorted files, the manifest and datasheets go
    pub output_dir: PathBuf,
    pub folders: FolderNames,
    pub catalog: CatalogConfig,
    pub manifest: ManifestConfig,
    /// Phrase report written into the `Other` folder
    pub phrase_report: String,
    /// Filename keyword → header phrase, first match wins
    pub phrases: Vec<PhraseRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderNames {
    pub liv: String,
    pub smsr: String,
    pub other: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Workbook holding the SKU key sheet (.xlsx or .xlsm)
    pub path: PathBuf,
    pub sheet: String,
    pub column: String,
    pub tolerance_nm: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub file_name: String,
    pub sheet: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseRule {
    pub keyword: String,
    pub phrase: String,
}

impl PhraseRule {
    pub fn new(keyword: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            phrase: phrase.into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("Paste Raw Data HERE"),
            output_dir: PathBuf::from("Script Output"),
            folders: FolderNames::default(),
            catalog: CatalogConfig::default(),
            manifest: ManifestConfig::default(),
            phrase_report: "PhraseCounts.xlsx".to_string(),
            phrases: default_phrases(),
        }
    }
}

impl Default for FolderNames {
    fn default() -> Self {
        Self {
            liv: "LIV".to_string(),
            smsr: "SMSR".to_string(),
            other: "Other".to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("Datasheet Graph Template 1.xlsm"),
            sheet: "Key".to_string(),
            column: "SKU".to_string(),
            tolerance_nm: DEFAULT_TOLERANCE_NM,
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            file_name: "Devices.xlsx".to_string(),
            sheet: "Devices".to_string(),
        }
    }
}

fn default_phrases() -> Vec<PhraseRule> {
    [
        (MeasurementKind::LivVsTemp, "LIV Sweep vs Temperature"),
        (MeasurementKind::SpecWidth, "Mode Spacing vs I &T"),
        (MeasurementKind::WltSmsr, "SMSR vs I &T"),
        (MeasurementKind::WltWave, "Peak Wavelength vs I &T"),
    ]
    .into_iter()
    .map(|(kind, phrase)| PhraseRule::new(kind.keyword(), phrase))
    .collect()
}

impl Config {
    /// Load and validate a YAML config, resolving relative paths.
    pub fn load(path: &Path) -> DatasheetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DatasheetError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let mut config = Self::from_yaml(&content)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without touching paths. An empty document is all defaults.
    pub fn from_yaml(content: &str) -> DatasheetResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Make relative paths relative to `base_dir`.
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for path in [
            &mut self.source_dir,
            &mut self.output_dir,
            &mut self.catalog.path,
        ] {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }

    pub fn validate(&self) -> DatasheetResult<()> {
        let tolerance = self.catalog.tolerance_nm;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(DatasheetError::Config(format!(
                "catalog.tolerance_nm must be a non-negative number, got {}",
                tolerance
            )));
        }

        if self.source_dir == self.output_dir {
            return Err(DatasheetError::Config(format!(
                "source_dir and output_dir must differ, both are '{}'",
                self.source_dir.display()
            )));
        }

        let folders = [&self.folders.liv, &self.folders.smsr, &self.folders.other];
        if folders.iter().any(|f| f.trim().is_empty()) {
            return Err(DatasheetError::Config(
                "folder names must not be empty".to_string(),
            ));
        }
        if folders[0] == folders[1] || folders[0] == folders[2] || folders[1] == folders[2] {
            return Err(DatasheetError::Config(
                "folders.liv, folders.smsr and folders.other must differ".to_string(),
            ));
        }

        for rule in &self.phrases {
            if rule.keyword.is_empty() || rule.phrase.is_empty() {
                return Err(DatasheetError::Config(format!(
                    "phrase rule needs both keyword and phrase (keyword: '{}')",
                    rule.keyword
                )));
            }
        }

        if self.phrase_report.trim().is_empty() {
            return Err(DatasheetError::Config(
                "phrase_report must name a workbook file".to_string(),
            ));
        }

        if self.manifest.file_name.is_empty() || self.manifest.sheet.is_empty() {
            return Err(DatasheetError::Config(
                "manifest.file_name and manifest.sheet must be set".to_string(),
            ));
        }

        Ok(())
    }

    pub fn liv_dir(&self) -> PathBuf {
        self.output_dir.join(&self.folders.liv)
    }

    pub fn smsr_dir(&self) -> PathBuf {
        self.output_dir.join(&self.folders.smsr)
    }

    pub fn other_dir(&self) -> PathBuf {
        self.output_dir.join(&self.folders.other)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest.file_name)
    }

    pub fn phrase_report_path(&self) -> PathBuf {
        self.other_dir().join(&self.phrase_report)
    }
}
