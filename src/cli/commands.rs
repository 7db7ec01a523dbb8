use crate::config::Config;
use crate::error::{DatasheetError, DatasheetResult};
use crate::excel::{
    build_manifest, read_manifest, write_manifest, write_phrase_report, CatalogImporter,
    ManifestBuild,
};
use crate::resolver::{DeviceResolver, FilenameParser, SkuCatalog, SkuMatch, SkuMatcher};
use crate::staging::{self, RepairReport, SortReport};
use crate::types::{DeviceIdentity, MeasurementKind};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

/// Command-line overrides applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub source: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
}

/// Load the config (or defaults) and apply overrides.
pub fn load_config(path: Option<PathBuf>, overrides: ConfigOverrides) -> DatasheetResult<Config> {
    let mut config = match path {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };

    if let Some(source) = overrides.source {
        config.source_dir = source;
    }
    if let Some(output) = overrides.output {
        config.output_dir = output;
    }
    if let Some(catalog) = overrides.catalog {
        config.catalog.path = catalog;
    }

    config.validate()?;
    Ok(config)
}

/// Execute the sort command: copy raw files and sort them into folders
pub fn sort(config: &Config, verbose: bool) -> DatasheetResult<SortReport> {
    println!("{}", "📂 Datasheet - Sorting raw files".bold().green());
    println!("   Source: {}", config.source_dir.display());
    println!("   Output: {}\n", config.output_dir.display());

    let report = staging::sort_raw_files(config)?;

    println!("{}", "✅ Files copied and organized:".bold().green());
    println!("   {:<8} {}", config.folders.liv.cyan(), report.liv);
    println!("   {:<8} {}", config.folders.smsr.cyan(), report.smsr);
    println!("   {:<8} {}", config.folders.other.cyan(), report.text);
    if verbose || report.unsorted > 0 {
        println!("   {:<8} {}", "(root)".cyan(), report.unsorted);
    }
    print_failures(&report.failures);
    println!();

    Ok(report)
}

/// Execute the repair command: trim repeated headers in text files
pub fn repair(config: &Config, verbose: bool) -> DatasheetResult<RepairReport> {
    let other_dir = config.other_dir();
    println!("{}", "🔧 Datasheet - Repairing text files".bold().green());
    println!("   Folder: {}\n", other_dir.display());

    let report = staging::repair_text_files(&other_dir, &config.phrases)?;

    for count in &report.counts {
        match count.trimmed_from {
            Some(line) => println!(
                "   {} {} ({} headers, kept from line {})",
                "✂".yellow(),
                count.filename,
                count.count,
                line
            ),
            None if verbose => println!(
                "   {} {} ({} header{})",
                "✓".green(),
                count.filename,
                count.count,
                if count.count == 1 { "" } else { "s" }
            ),
            None => {}
        }
    }

    let report_path = config.phrase_report_path();
    write_phrase_report(&report_path, &report.counts)?;

    println!(
        "\n{} {} files checked, {} trimmed",
        "✅".green(),
        report.counts.len(),
        report.trimmed()
    );
    println!("   Report: {}", report_path.display());
    print_failures(&report.failures);
    println!();

    Ok(report)
}

/// Execute the devices command: build and write the device manifest
pub fn devices(config: &Config, verbose: bool) -> DatasheetResult<ManifestBuild> {
    println!("{}", "📋 Datasheet - Building device manifest".bold().green());

    let catalog = match CatalogImporter::from_config(&config.catalog).import() {
        Ok(catalog) if catalog.is_empty() => {
            println!(
                "   {} SKU lookup table '{}' has no SKU rows - SKUs will be left blank",
                "⚠️".yellow(),
                config.catalog.sheet
            );
            catalog
        }
        Ok(catalog) => {
            println!("   Loaded SKU lookup table with {} entries", catalog.len());
            catalog
        }
        Err(e) => {
            warn!(error = %e, "could not load SKU lookup table, continuing without SKUs");
            println!(
                "   {} No SKU lookup table at {} - SKUs will be left blank",
                "⚠️".yellow(),
                config.catalog.path.display()
            );
            SkuCatalog::empty()
        }
    };

    let resolver = DeviceResolver::new(catalog, config.catalog.tolerance_nm)?;
    let build = build_manifest(&config.liv_dir(), &resolver)?;

    if verbose {
        for record in &build.records {
            let sku = match &record.sku {
                Some(sku) => sku.bright_blue().to_string(),
                None => "(no SKU found)".yellow().to_string(),
            };
            println!("   {} / {} → {}", record.lot_id, record.dev_num.cyan(), sku);
        }
    }
    for name in &build.skipped {
        println!("   {} Could not parse {}", "❌".red(), name);
    }

    let manifest_path = config.manifest_path();
    write_manifest(&manifest_path, &config.manifest.sheet, &build.records)?;

    println!(
        "\n{} {} devices ({} without SKU, {} duplicate files, {} unparsed)",
        "✅".green(),
        build.records.len(),
        build.without_sku(),
        build.duplicates,
        build.skipped.len()
    );
    println!("   Manifest: {}\n", manifest_path.display());

    Ok(build)
}

/// Execute the prepare command: sort, build the manifest, repair text files
pub fn prepare(config: &Config, verbose: bool) -> DatasheetResult<()> {
    sort(config, verbose)?;
    devices(config, verbose)?;
    repair(config, verbose)?;
    println!("{}", "✅ All steps complete.".bold().green());
    Ok(())
}

#[derive(Debug, Serialize)]
struct ParsedName<'a> {
    filename: &'a str,
    #[serde(flatten)]
    identity: Option<&'a DeviceIdentity>,
    error: Option<String>,
}

/// Execute the parse command: show the device identity of each filename
///
/// Fails with the first unparseable filename after reporting all of them.
pub fn parse(filenames: Vec<String>, json: bool) -> DatasheetResult<Vec<DeviceIdentity>> {
    let parser = FilenameParser::new()?;
    let results: Vec<_> = filenames
        .iter()
        .map(|name| (name.as_str(), parser.parse_with_rule(name)))
        .collect();

    if json {
        let rows: Vec<ParsedName> = results
            .iter()
            .map(|(filename, result)| ParsedName {
                filename: *filename,
                identity: result.as_ref().ok().map(|(id, _)| id),
                error: result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for (filename, result) in &results {
            match result {
                Ok((id, rule)) => println!(
                    "{} {}\n   Lot_ID: {}  Dev#: {}  ({:?})",
                    "✅".green(),
                    filename,
                    id.lot_id.bright_blue(),
                    id.dev_num.cyan(),
                    rule
                ),
                Err(e) => println!("{} {}", "❌".red(), e),
            }
        }
    }

    let mut identities = Vec::with_capacity(results.len());
    for (filename, result) in results {
        match result {
            Ok((id, _)) => identities.push(id),
            Err(_) => return Err(DatasheetError::parse(filename)),
        }
    }
    Ok(identities)
}

/// Execute the match command: find the SKU for a lot identifier
///
/// `skus` replaces the configured catalog when non-empty.
pub fn match_sku(config: &Config, lot_id: String, skus: Vec<String>) -> DatasheetResult<Option<SkuMatch>> {
    let catalog = if skus.is_empty() {
        CatalogImporter::from_config(&config.catalog).import()?
    } else {
        SkuCatalog::from_skus(skus)
    };

    let matcher = SkuMatcher::new(config.catalog.tolerance_nm)?;
    println!("{}", "🔍 Datasheet - SKU lookup".bold().green());
    println!("   Lot_ID: {}", lot_id.bright_blue().bold());

    let Some(lot) = matcher.parse_lot(&lot_id) else {
        println!(
            "   {} Lot_ID does not start with <wavelength>-<TYPE>",
            "⚠️".yellow()
        );
        return Ok(None);
    };
    println!(
        "   Wavelength: {} nm  Type: {}  Tolerance: ±{} nm\n",
        lot.wavelength,
        lot.device_type.cyan(),
        matcher.tolerance_nm()
    );

    let candidates = matcher.candidates(&lot, catalog.skus());
    for (rank, candidate) in candidates.iter().enumerate() {
        println!(
            "   {}. {:<16} Δλ={:<5} specificity={}",
            rank + 1,
            candidate.sku,
            candidate.wavelength_diff,
            candidate.specificity
        );
    }

    let found = matcher.find(&lot_id, &catalog);
    match &found {
        Some(m) => println!("\n{} Best match: {}", "✅".green(), m.sku.bold().green()),
        None => println!("{} No matching SKU - fill in manually", "⚠️".yellow()),
    }
    Ok(found)
}

/// Per-device result of the check command.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceCheck {
    pub identity: DeviceIdentity,
    pub document_name: String,
    pub missing: Vec<MeasurementKind>,
}

/// Execute the check command: verify each manifest row has its data files
pub fn check(config: &Config) -> DatasheetResult<Vec<DeviceCheck>> {
    let manifest_path = config.manifest_path();
    println!("{}", "🔎 Datasheet - Checking manifest".bold().green());
    println!("   Manifest: {}\n", manifest_path.display());

    let records = read_manifest(&manifest_path, &config.manifest.sheet)?;
    let other_dir = config.other_dir();

    let mut checks = Vec::with_capacity(records.len());
    for record in records {
        let identity = record.identity();
        let mut missing = Vec::new();
        for kind in MeasurementKind::DATASHEET_INPUTS {
            if staging::locate_measurement(&other_dir, &identity, kind)?.is_none() {
                missing.push(kind);
            }
        }

        if missing.is_empty() {
            println!("   {} {}", "✅".green(), record.document_name());
        } else {
            let names: Vec<&str> = missing.iter().map(|k| k.keyword()).collect();
            println!(
                "   {} {} - missing {}",
                "⚠️".yellow(),
                record.document_name(),
                names.join(", ").red()
            );
        }

        checks.push(DeviceCheck {
            identity,
            document_name: record.document_name(),
            missing,
        });
    }

    let complete = checks.iter().filter(|c| c.missing.is_empty()).count();
    println!("\n   {}/{} devices ready", complete, checks.len());
    Ok(checks)
}

fn print_failures(failures: &[(String, String)]) {
    for (name, error) in failures {
        println!("   {} {}: {}", "❌".red(), name, error);
    }
}
