//! Core data model: sources, per-source field bags, and the unified journal record.
//!
//! Seven independent rating sources contribute fields. Each source keeps its own
//! namespace on the unified record, so a missing `Option` means "this source had
//! no entry for this journal", never "empty value".

use serde::{Deserialize, Serialize};
use std::fmt;

/// The seven rating sources, in merge priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "ABDC")]
    Abdc,
    #[serde(rename = "ABS")]
    Abs,
    #[serde(rename = "SJR")]
    Sjr,
    #[serde(rename = "JCR")]
    Jcr,
    #[serde(rename = "CiteScore")]
    CiteScore,
    #[serde(rename = "Wiley")]
    Wiley,
    #[serde(rename = "Predatory")]
    Predatory,
}

impl Source {
    /// Fixed merge order: highest priority first. Wiley and Predatory share the
    /// lowest weight; their fields never overlap, and this array order is the
    /// deterministic tie-break if they ever do.
    pub const MERGE_ORDER: [Source; 7] = [
        Source::Abdc,
        Source::Abs,
        Source::Sjr,
        Source::Jcr,
        Source::CiteScore,
        Source::Wiley,
        Source::Predatory,
    ];

    /// Conflict-resolution weight. Higher wins; lower priority never overwrites.
    pub fn priority(&self) -> u8 {
        match self {
            Source::Abdc => 6,
            Source::Abs => 5,
            Source::Sjr => 4,
            Source::Jcr => 3,
            Source::CiteScore => 2,
            Source::Wiley => 1,
            Source::Predatory => 1,
        }
    }

    /// Canonical source name as used in errors, logs and serialized records
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Abdc => "ABDC",
            Source::Abs => "ABS",
            Source::Sjr => "SJR",
            Source::Jcr => "JCR",
            Source::CiteScore => "CiteScore",
            Source::Wiley => "Wiley",
            Source::Predatory => "Predatory",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SJR quartile bucket (top 25% = Q1 ... bottom 25% = Q4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quartile {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quartile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quartile::Q1 => "Q1",
            Quartile::Q2 => "Q2",
            Quartile::Q3 => "Q3",
            Quartile::Q4 => "Q4",
        }
    }

    /// Parse a cell value like "Q1" (case-insensitive). Anything else is None.
    pub fn parse(value: &str) -> Option<Quartile> {
        match value.trim().to_uppercase().as_str() {
            "Q1" => Some(Quartile::Q1),
            "Q2" => Some(Quartile::Q2),
            "Q3" => Some(Quartile::Q3),
            "Q4" => Some(Quartile::Q4),
            _ => None,
        }
    }
}

impl fmt::Display for Quartile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wiley open-access catalogue fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WileyData {
    /// Subject area; empty means Wiley listed the title without one
    pub subject_area: String,
    /// Article Processing Charge in USD, kept as the raw cell string
    pub apc_usd: String,
}

/// Scimago Journal Rank fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SjrData {
    pub quartile: Quartile,
    pub score: f64,
    pub h_index: u32,
    pub citable_docs: u32,
    pub year: i32,
}

/// Journal Citation Reports fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JcrData {
    pub impact_factor: f64,
    /// JCR quartile string; unlike SJR this source is not guaranteed clean,
    /// so the raw value is kept (may be empty)
    pub quartile: String,
    pub category: String,
    pub citations: u64,
    pub year: i32,
}

/// CiteScore (Scopus) fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CiteScoreData {
    pub score: f64,
    /// Percentile within category, 0..=100
    pub percentile: f64,
    pub citations: u64,
    pub year: i32,
}

/// Predatory-journal watchlist fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredatoryData {
    pub is_predatory: bool,
    /// Which watchlist flagged the journal
    pub source: String,
    pub reason: String,
    /// Date string (YYYY-MM-DD) of the last watchlist check
    pub last_checked: String,
}

/// Data-quality tier, derived from how many sources contributed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    High,
    Medium,
    Low,
}

impl DataQuality {
    /// >=3 sources: high, exactly 2: medium, 0 or 1: low
    pub fn from_source_count(count: usize) -> DataQuality {
        match count {
            n if n >= 3 => DataQuality::High,
            2 => DataQuality::Medium,
            _ => DataQuality::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::High => "high",
            DataQuality::Medium => "medium",
            DataQuality::Low => "low",
        }
    }
}

/// Composite quality tier derived from ABDC/ABS/JCR/SJR (MB > B > R > F > none)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Qualis {
    #[serde(rename = "MB")]
    Mb,
    B,
    R,
    F,
    #[serde(rename = "-")]
    Unrated,
}

impl Qualis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Qualis::Mb => "MB",
            Qualis::B => "B",
            Qualis::R => "R",
            Qualis::F => "F",
            Qualis::Unrated => "-",
        }
    }

    /// Ordinal rank for sorting (higher is better, unrated last)
    pub fn rank(&self) -> u8 {
        match self {
            Qualis::Mb => 4,
            Qualis::B => 3,
            Qualis::R => 2,
            Qualis::F => 1,
            Qualis::Unrated => 0,
        }
    }
}

impl fmt::Display for Qualis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unified, deduplicated journal record combining every source's view.
///
/// Immutable after the merge: the query engine only selects, sorts and slices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedJournal {
    /// Normalized matching identity, unique across the unified set
    pub key: String,
    /// Word-capitalized form of `key`, used for presentation and as sort key
    pub display_name: String,
    /// ABDC rating (A*, A, B, C)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abdc: Option<String>,
    /// ABS/AJG rating (4*, 4, 3, 2, 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiley_subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiley_apc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sjr: Option<SjrData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jcr: Option<JcrData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cite_score: Option<CiteScoreData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predatory: Option<PredatoryData>,
    /// Sources that contributed at least one non-empty field, in merge order
    pub sources: Vec<Source>,
    pub data_quality: DataQuality,
    /// Derived composite tier; always re-derivable from abdc/abs/jcr/sjr
    pub qualis: Qualis,
}

impl UnifiedJournal {
    /// Empty record for `key`, before any source contributes
    pub fn new(key: String, display_name: String) -> Self {
        UnifiedJournal {
            key,
            display_name,
            abdc: None,
            abs: None,
            wiley_subject: None,
            wiley_apc: None,
            sjr: None,
            jcr: None,
            cite_score: None,
            predatory: None,
            sources: Vec::new(),
            data_quality: DataQuality::Low,
            qualis: Qualis::Unrated,
        }
    }

    /// JCR quartile as a parsed enum, if the raw string is one of Q1..Q4
    pub fn jcr_quartile(&self) -> Option<Quartile> {
        self.jcr.as_ref().and_then(|j| Quartile::parse(&j.quartile))
    }

    /// SJR quartile, if SJR contributed
    pub fn sjr_quartile(&self) -> Option<Quartile> {
        self.sjr.as_ref().map(|s| s.quartile)
    }

    /// Whether the predatory watchlist flagged this journal.
    /// Absent predatory data defaults to false.
    pub fn is_predatory(&self) -> bool {
        self.predatory.as_ref().map(|p| p.is_predatory).unwrap_or(false)
    }

    /// Whether a non-empty Wiley APC value is present
    pub fn has_wiley_apc(&self) -> bool {
        self.wiley_apc.as_deref().map(|a| !a.is_empty()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order_is_decreasing() {
        let weights: Vec<u8> = Source::MERGE_ORDER.iter().map(|s| s.priority()).collect();
        for pair in weights.windows(2) {
            assert!(pair[0] >= pair[1], "merge order must be sorted by priority");
        }
    }

    #[test]
    fn test_data_quality_thresholds() {
        assert_eq!(DataQuality::from_source_count(0), DataQuality::Low);
        assert_eq!(DataQuality::from_source_count(1), DataQuality::Low);
        assert_eq!(DataQuality::from_source_count(2), DataQuality::Medium);
        assert_eq!(DataQuality::from_source_count(3), DataQuality::High);
        assert_eq!(DataQuality::from_source_count(7), DataQuality::High);
    }

    #[test]
    fn test_quartile_parse() {
        assert_eq!(Quartile::parse("Q1"), Some(Quartile::Q1));
        assert_eq!(Quartile::parse(" q3 "), Some(Quartile::Q3));
        assert_eq!(Quartile::parse("Top 10%"), None);
        assert_eq!(Quartile::parse(""), None);
    }

    #[test]
    fn test_qualis_serde_names() {
        let json = serde_json::to_string(&Qualis::Mb).expect("serialize");
        assert_eq!(json, "\"MB\"");
        let json = serde_json::to_string(&Qualis::Unrated).expect("serialize");
        assert_eq!(json, "\"-\"");
    }

    #[test]
    fn test_predatory_default_false() {
        let j = UnifiedJournal::new("x".into(), "X".into());
        assert!(!j.is_predatory());
        assert!(!j.has_wiley_apc());
    }
}
