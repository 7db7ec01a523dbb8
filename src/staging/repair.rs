//! Repeated-header repair for text measurement files
//!
//! When a sweep is restarted the station appends a second run to the same
//! text file. Only the last run is valid, so a file whose header phrase
//! appears more than once is cut back to start at the last occurrence.

use super::list_files;
use crate::config::PhraseRule;
use crate::error::DatasheetResult;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Result of inspecting one text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseCount {
    pub filename: String,
    pub keyword: String,
    pub phrase: String,
    /// Lines containing the phrase
    pub count: usize,
    /// 1-based line the file now starts at, when it was trimmed
    pub trimmed_from: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    pub counts: Vec<PhraseCount>,
    /// (filename, error) for files that could not be read or rewritten
    pub failures: Vec<(String, String)>,
}

impl RepairReport {
    pub fn trimmed(&self) -> usize {
        self.counts.iter().filter(|c| c.trimmed_from.is_some()).count()
    }
}

/// Count lines containing `phrase`; with more than one, return the content
/// from the last such line onward (line endings kept).
///
/// Returns `(count, Some((first_kept_index, trimmed)))` when trimmed.
pub fn repair_text(content: &str, phrase: &str) -> (usize, Option<(usize, String)>) {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let hits: Vec<usize> = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| line.contains(phrase))
        .map(|(idx, _)| idx)
        .collect();

    match hits.last() {
        Some(&last) if hits.len() > 1 => (hits.len(), Some((last, lines[last..].concat()))),
        _ => (hits.len(), None),
    }
}

/// Inspect every `.txt` file in `dir` and trim repeated runs in place.
///
/// The first rule whose keyword appears in the filename applies; files
/// matching no rule are left alone and not reported.
pub fn repair_text_files(dir: &Path, rules: &[PhraseRule]) -> DatasheetResult<RepairReport> {
    let mut report = RepairReport::default();

    for name in list_files(dir, Some(".txt"))? {
        let Some(rule) = rules.iter().find(|r| name.contains(&r.keyword)) else {
            continue;
        };

        match repair_file(&dir.join(&name), &rule.phrase) {
            Ok((count, trimmed_from)) => {
                if let Some(line) = trimmed_from {
                    info!(filename = %name, count, line, "retained lines from last header onward");
                }
                report.counts.push(PhraseCount {
                    filename: name,
                    keyword: rule.keyword.clone(),
                    phrase: rule.phrase.clone(),
                    count,
                    trimmed_from,
                });
            }
            Err(e) => {
                warn!(filename = %name, error = %e, "error processing text file");
                report.failures.push((name, e.to_string()));
            }
        }
    }

    Ok(report)
}

fn repair_file(path: &Path, phrase: &str) -> DatasheetResult<(usize, Option<usize>)> {
    let content = fs::read_to_string(path)?;
    let (count, trimmed) = repair_text(&content, phrase);
    match trimmed {
        Some((first_kept, kept)) => {
            fs::write(path, kept)?;
            Ok((count, Some(first_kept + 1)))
        }
        None => Ok((count, None)),
    }
}
