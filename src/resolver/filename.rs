//! Measurement filename → device identity
//!
//! The test station has written several naming schemes over the years:
//!
//! - `795-DBRL051525B-G11X_DryEtch-37-131_0.0900A_LIV_vs_Temp.jpg`
//! - `852-DBRL051723C-G2X-25-79_0.1500A_LIV_vs_Temp.jpg`
//! - `<anything>X[_DryEtch]-<n>-<n>...`
//! - plain `a-b-c-...-d-e` with at least five dash segments
//!
//! Rules are tried in that order and the first one that applies decides the
//! identity. The chain is heuristic: a new naming scheme can be claimed by
//! the wrong rule, so new schemes need a new rule placed ahead of the
//! fallbacks rather than a tweak to an existing one.

use crate::error::{DatasheetError, DatasheetResult};
use crate::types::DeviceIdentity;
use regex::Regex;
use tracing::debug;

/// Extensions removed before parsing.
pub const KNOWN_EXTENSIONS: [&str; 2] = [".jpg", ".txt"];

/// Measurement-type suffixes removed before parsing, in removal order.
pub const MEASUREMENT_SUFFIXES: [&str; 5] = [
    "_LIV_vs_Temp",
    "_SpecWidth",
    "_Wave-SMSR_vs_Temp",
    "_WLT_SMSR",
    "_WLT_Wave",
];

/// Start of the drive-current token, e.g. `_0.0900A`.
const CURRENT_TOKEN: &str = "_0.";

const DRY_ETCH_MARKER: &str = "G11X_DryEtch-";
const DRY_ETCH_DELIMITER: &str = "_DryEtch-";
const G2X_MARKER: &str = "G2X-";

const GENERIC_PATTERN: &str = r"^(.+X)(?:_DryEtch)?-(\d+-\d+)";

/// Minimum dash segments for the last-resort split.
const MIN_DASH_SEGMENTS: usize = 5;

/// Naming rules in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamingRule {
    /// `<lot>_DryEtch-<dev>` for G11X lots
    DryEtch,
    /// `<a>-<b>-G2X-<d1>-<d2>`
    G2x,
    /// `<...X>[_DryEtch]-<d1>-<d2>`
    Generic,
    /// first three dash segments / last two dash segments
    DashSegments,
}

impl NamingRule {
    pub const ORDER: [NamingRule; 4] = [
        NamingRule::DryEtch,
        NamingRule::G2x,
        NamingRule::Generic,
        NamingRule::DashSegments,
    ];
}

/// Parses measurement filenames into [`DeviceIdentity`] values.
#[derive(Debug, Clone)]
pub struct FilenameParser {
    generic: Regex,
}

impl FilenameParser {
    pub fn new() -> DatasheetResult<Self> {
        Ok(Self {
            generic: Regex::new(GENERIC_PATTERN)?,
        })
    }

    /// Resolve the device identity encoded in `filename`.
    pub fn parse(&self, filename: &str) -> DatasheetResult<DeviceIdentity> {
        self.parse_with_rule(filename).map(|(identity, _)| identity)
    }

    /// Like [`parse`](Self::parse), also reporting which rule applied.
    ///
    /// A rule that applies but leaves the lot or device number empty fails
    /// the whole filename; later rules are not consulted.
    pub fn parse_with_rule(&self, filename: &str) -> DatasheetResult<(DeviceIdentity, NamingRule)> {
        let base = strip_measurement_tokens(filename);

        for rule in NamingRule::ORDER {
            if let Some((lot_id, dev_num)) = self.apply(rule, &base) {
                if lot_id.is_empty() || dev_num.is_empty() {
                    return Err(DatasheetError::parse(filename));
                }
                debug!(filename, ?rule, %lot_id, %dev_num, "parsed measurement filename");
                return Ok((DeviceIdentity::new(lot_id, dev_num), rule));
            }
        }

        Err(DatasheetError::parse(filename))
    }

    fn apply(&self, rule: NamingRule, base: &str) -> Option<(String, String)> {
        match rule {
            NamingRule::DryEtch => {
                if !base.contains(DRY_ETCH_MARKER) {
                    return None;
                }
                let mut parts = base.split(DRY_ETCH_DELIMITER);
                let lot_id = parts.next()?;
                let dev_num = parts.next()?;
                Some((lot_id.to_string(), dev_num.to_string()))
            }
            NamingRule::G2x => {
                if !base.contains(G2X_MARKER) {
                    return None;
                }
                let parts: Vec<&str> = base.split('-').collect();
                let lot_end = parts.len().min(3);
                let dev_end = parts.len().min(5);
                Some((parts[..lot_end].join("-"), parts[lot_end..dev_end].join("-")))
            }
            NamingRule::Generic => {
                let caps = self.generic.captures(base)?;
                Some((caps[1].to_string(), caps[2].to_string()))
            }
            NamingRule::DashSegments => {
                let parts: Vec<&str> = base.split('-').collect();
                if parts.len() < MIN_DASH_SEGMENTS {
                    return None;
                }
                Some((
                    parts[..3].join("-"),
                    parts[parts.len() - 2..].join("-"),
                ))
            }
        }
    }
}

/// Remove extensions, measurement suffixes and the drive-current token.
pub fn strip_measurement_tokens(filename: &str) -> String {
    let mut base = filename.to_string();
    for token in KNOWN_EXTENSIONS.iter().chain(MEASUREMENT_SUFFIXES.iter()) {
        base = base.replace(token, "");
    }
    if let Some(idx) = base.find(CURRENT_TOKEN) {
        base.truncate(idx);
    }
    base
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> FilenameParser {
        FilenameParser::new().unwrap()
    }

    #[test]
    fn test_strip_measurement_tokens() {
        assert_eq!(
            strip_measurement_tokens("795-DBRL051525B-G11X_DryEtch-37-131_0.0900A_LIV_vs_Temp.jpg"),
            "795-DBRL051525B-G11X_DryEtch-37-131"
        );
        assert_eq!(
            strip_measurement_tokens("852-A-G2X-1-2_0.1500A_Wave-SMSR_vs_Temp.jpg"),
            "852-A-G2X-1-2"
        );
        assert_eq!(strip_measurement_tokens("plain_name"), "plain_name");
    }

    #[test]
    fn test_current_token_splits_at_first_occurrence() {
        assert_eq!(strip_measurement_tokens("a_0.1A_0.2A"), "a");
    }

    #[test]
    fn test_dry_etch_rule() {
        let (id, rule) = parser()
            .parse_with_rule("795-DBRL051525B-G11X_DryEtch-37-131_0.0900A_LIV_vs_Temp.jpg")
            .unwrap();
        assert_eq!(rule, NamingRule::DryEtch);
        assert_eq!(id.lot_id, "795-DBRL051525B-G11X");
        assert_eq!(id.dev_num, "37-131");
    }

    #[test]
    fn test_g2x_rule() {
        let (id, rule) = parser()
            .parse_with_rule("852-DBRL051723C-G2X-25-79_0.1500A_LIV_vs_Temp.jpg")
            .unwrap();
        assert_eq!(rule, NamingRule::G2x);
        assert_eq!(id, DeviceIdentity::new("852-DBRL051723C-G2X", "25-79"));
    }

    #[test]
    fn test_g2x_rule_with_four_segments() {
        let id = parser().parse("852-DBRL-G2X-25.jpg").unwrap();
        assert_eq!(id, DeviceIdentity::new("852-DBRL-G2X", "25"));
    }

    #[test]
    fn test_generic_rule() {
        let (id, rule) = parser()
            .parse_with_rule("905-FP010124A-G5X-12-34_0.2000A_WLT_Wave.txt")
            .unwrap();
        assert_eq!(rule, NamingRule::Generic);
        assert_eq!(id, DeviceIdentity::new("905-FP010124A-G5X", "12-34"));
    }

    #[test]
    fn test_generic_rule_with_dry_etch_on_other_growth() {
        let (id, rule) = parser()
            .parse_with_rule("905-FP010124A-G5X_DryEtch-12-34_WLT_SMSR.txt")
            .unwrap();
        assert_eq!(rule, NamingRule::Generic);
        assert_eq!(id, DeviceIdentity::new("905-FP010124A-G5X", "12-34"));
    }

    #[test]
    fn test_dash_segment_rule() {
        let (id, rule) = parser()
            .parse_with_rule("780-VCSEL-A1-B2-10-20_SpecWidth.txt")
            .unwrap();
        assert_eq!(rule, NamingRule::DashSegments);
        assert_eq!(id, DeviceIdentity::new("780-VCSEL-A1", "10-20"));
    }

    #[test]
    fn test_unparseable_filename() {
        let err = parser().parse("notes.jpg").unwrap_err();
        match err {
            DatasheetError::Parse { filename } => assert_eq!(filename, "notes.jpg"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_device_number_fails() {
        assert!(parser().parse("795-DBRL-G11X_DryEtch-.jpg").is_err());
    }
}
