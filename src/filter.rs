//! Query/filter engine.
//!
//! A [`FilterSpec`] is the UI-owned filter state: facet selections, numeric
//! ranges, boolean flags and a free-text search term. All active predicates
//! are ANDed; an empty set or `None` leaves that dimension inactive. One pass
//! over the records produces both the matched subset and the result
//! statistics. Records are never mutated, only selected.

use crate::model::UnifiedJournal;
use crate::stats::Distributions;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filter state fed into [`apply_filters`].
///
/// A min bound greater than its max bound fails closed: no record can satisfy
/// both inclusive comparisons, so that dimension matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    /// Case-insensitive substring match against the display name
    pub search_term: String,
    pub abdc: Vec<String>,
    pub abs: Vec<String>,
    pub qualis: Vec<String>,
    pub sjr_quartile: Vec<String>,
    pub jcr_quartile: Vec<String>,
    /// Require the predatory flag to equal this (absent data counts as false)
    pub predatory: Option<bool>,
    /// Require presence (or absence) of a non-empty Wiley APC value
    pub has_wiley_apc: Option<bool>,
    pub min_cite_score: Option<f64>,
    pub max_cite_score: Option<f64>,
    pub min_h_index: Option<u32>,
    pub max_h_index: Option<u32>,
    pub wiley_subjects: Vec<String>,
}

impl FilterSpec {
    /// Number of filter dimensions that are active. The paired numeric bounds
    /// count individually, matching how the UI surfaces them.
    pub fn active_filter_count(&self) -> usize {
        let mut count = 0;
        if !self.search_term.is_empty() {
            count += 1;
        }
        count += [&self.abdc, &self.abs, &self.qualis, &self.sjr_quartile, &self.jcr_quartile, &self.wiley_subjects]
            .iter()
            .filter(|set| !set.is_empty())
            .count();
        count += [self.predatory, self.has_wiley_apc].iter().filter(|o| o.is_some()).count();
        count += [self.min_cite_score, self.max_cite_score].iter().filter(|o| o.is_some()).count();
        count += [self.min_h_index, self.max_h_index].iter().filter(|o| o.is_some()).count();
        count
    }

    /// Whether any dimension is active
    pub fn is_active(&self) -> bool {
        self.active_filter_count() > 0
    }

    /// Test a single record against every active predicate.
    pub fn matches(&self, journal: &UnifiedJournal) -> bool {
        self.matches_with_search(journal, &self.search_term.to_lowercase())
    }

    fn matches_with_search(&self, journal: &UnifiedJournal, search_lower: &str) -> bool {
        if !search_lower.is_empty() && !journal.display_name.to_lowercase().contains(search_lower) {
            return false;
        }

        if !member_of(&self.abdc, journal.abdc.as_deref()) {
            return false;
        }
        if !member_of(&self.abs, journal.abs.as_deref()) {
            return false;
        }
        if !member_of(&self.qualis, Some(journal.qualis.as_str())) {
            return false;
        }
        if !member_of(
            &self.sjr_quartile,
            journal.sjr_quartile().map(|q| q.as_str()),
        ) {
            return false;
        }
        if !member_of(
            &self.jcr_quartile,
            journal.jcr.as_ref().map(|j| j.quartile.as_str()).filter(|q| !q.is_empty()),
        ) {
            return false;
        }

        if let Some(want) = self.predatory {
            if journal.is_predatory() != want {
                return false;
            }
        }
        if let Some(want) = self.has_wiley_apc {
            if journal.has_wiley_apc() != want {
                return false;
            }
        }

        if self.min_cite_score.is_some() || self.max_cite_score.is_some() {
            // A record without CiteScore data is excluded whenever either
            // bound is set
            let score = match journal.cite_score.as_ref() {
                Some(cs) => cs.score,
                None => return false,
            };
            if self.min_cite_score.map(|min| score < min).unwrap_or(false) {
                return false;
            }
            if self.max_cite_score.map(|max| score > max).unwrap_or(false) {
                return false;
            }
        }

        if self.min_h_index.is_some() || self.max_h_index.is_some() {
            let h_index = match journal.sjr.as_ref() {
                Some(sjr) => sjr.h_index,
                None => return false,
            };
            if self.min_h_index.map(|min| h_index < min).unwrap_or(false) {
                return false;
            }
            if self.max_h_index.map(|max| h_index > max).unwrap_or(false) {
                return false;
            }
        }

        if !self.wiley_subjects.is_empty() {
            match journal.wiley_subject.as_deref().filter(|s| !s.is_empty()) {
                Some(subject) if self.wiley_subjects.iter().any(|s| s == subject) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Exact-match facet: an empty set is inactive; an absent field never matches
/// a non-empty set.
fn member_of(set: &[String], value: Option<&str>) -> bool {
    if set.is_empty() {
        return true;
    }
    match value {
        Some(v) => set.iter().any(|s| s == v),
        None => false,
    }
}

/// Statistics computed alongside the matched subset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterStats {
    pub active_filter_count: usize,
    pub total_results: usize,
    pub original_total: usize,
    pub distributions: Distributions,
}

/// Matched subset plus its statistics
#[derive(Debug)]
pub struct FilterOutcome<'a> {
    pub matched: Vec<&'a UnifiedJournal>,
    pub stats: FilterStats,
}

/// Apply every active predicate in one pass, collecting the matched records
/// and their distributions.
pub fn apply_filters<'a>(records: &'a [UnifiedJournal], spec: &FilterSpec) -> FilterOutcome<'a> {
    let search_lower = spec.search_term.to_lowercase();
    let mut matched = Vec::new();
    let mut distributions = Distributions::default();

    for journal in records {
        if spec.matches_with_search(journal, &search_lower) {
            distributions.observe(journal);
            matched.push(journal);
        }
    }

    debug!(
        matched = matched.len(),
        total = records.len(),
        active = spec.active_filter_count(),
        "Applied filters"
    );

    let stats = FilterStats {
        active_filter_count: spec.active_filter_count(),
        total_results: matched.len(),
        original_total: records.len(),
        distributions,
    };

    FilterOutcome { matched, stats }
}

/// Named preset filter bundles.
///
/// Applying a preset replaces the active `FilterSpec` wholesale; it never
/// merges with prior filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPreset {
    /// No filters at all
    Clear,
    /// Elite journals: ABDC A* and ABS 4*
    TopTier,
    /// High quality: ABDC A and ABS 4
    HighQuality,
    /// Good quality: ABDC B and ABS 3
    GoodQuality,
    /// Top composite tier
    QualisMb,
    /// Journals with Wiley APC data
    WileyOnly,
    /// ABDC A* only
    AbdcAStar,
    /// ABS 4* only
    AbsFourStar,
    /// Exclude watchlisted journals
    NonPredatory,
}

impl FilterPreset {
    pub const ALL: [FilterPreset; 9] = [
        FilterPreset::Clear,
        FilterPreset::TopTier,
        FilterPreset::HighQuality,
        FilterPreset::GoodQuality,
        FilterPreset::QualisMb,
        FilterPreset::WileyOnly,
        FilterPreset::AbdcAStar,
        FilterPreset::AbsFourStar,
        FilterPreset::NonPredatory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FilterPreset::Clear => "clear",
            FilterPreset::TopTier => "top-tier",
            FilterPreset::HighQuality => "high-quality",
            FilterPreset::GoodQuality => "good-quality",
            FilterPreset::QualisMb => "qualis-mb",
            FilterPreset::WileyOnly => "wiley-only",
            FilterPreset::AbdcAStar => "abdc-a-star",
            FilterPreset::AbsFourStar => "abs-four-star",
            FilterPreset::NonPredatory => "non-predatory",
        }
    }

    pub fn from_name(name: &str) -> Option<FilterPreset> {
        FilterPreset::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// The concrete filter state this preset stands for
    pub fn spec(&self) -> FilterSpec {
        match self {
            FilterPreset::Clear => FilterSpec::default(),
            FilterPreset::TopTier => FilterSpec {
                abdc: vec!["A*".into()],
                abs: vec!["4*".into()],
                ..FilterSpec::default()
            },
            FilterPreset::HighQuality => FilterSpec {
                abdc: vec!["A".into()],
                abs: vec!["4".into()],
                ..FilterSpec::default()
            },
            FilterPreset::GoodQuality => FilterSpec {
                abdc: vec!["B".into()],
                abs: vec!["3".into()],
                ..FilterSpec::default()
            },
            FilterPreset::QualisMb => FilterSpec {
                qualis: vec!["MB".into()],
                ..FilterSpec::default()
            },
            FilterPreset::WileyOnly => FilterSpec {
                has_wiley_apc: Some(true),
                ..FilterSpec::default()
            },
            FilterPreset::AbdcAStar => FilterSpec {
                abdc: vec!["A*".into()],
                ..FilterSpec::default()
            },
            FilterPreset::AbsFourStar => FilterSpec {
                abs: vec!["4*".into()],
                ..FilterSpec::default()
            },
            FilterPreset::NonPredatory => FilterSpec {
                predatory: Some(false),
                ..FilterSpec::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::model::{CiteScoreData, PredatoryData, Quartile, SjrData, WileyData};
    use crate::parser::SourceTables;

    fn fixture() -> Vec<UnifiedJournal> {
        let mut tables = SourceTables::default();
        tables.abdc.insert("alpha finance".into(), "A*".into());
        tables.abdc.insert("beta economics".into(), "B".into());
        tables.abs.insert("alpha finance".into(), "4*".into());
        tables.sjr.insert(
            "gamma management".into(),
            SjrData {
                quartile: Quartile::Q2,
                score: 1.2,
                h_index: 55,
                citable_docs: 300,
                year: 2024,
            },
        );
        tables.cite_score.insert(
            "gamma management".into(),
            CiteScoreData {
                score: 6.5,
                percentile: 88.0,
                citations: 9000,
                year: 2024,
            },
        );
        tables.wiley.insert(
            "beta economics".into(),
            WileyData {
                subject_area: "Economics".into(),
                apc_usd: "2500".into(),
            },
        );
        tables.predatory.insert(
            "delta letters".into(),
            PredatoryData {
                is_predatory: true,
                source: "Beall".into(),
                reason: "no peer review".into(),
                last_checked: "2024-06-01".into(),
            },
        );
        merge(&tables)
    }

    #[test]
    fn test_inactive_spec_matches_everything() {
        let records = fixture();
        let outcome = apply_filters(&records, &FilterSpec::default());
        assert_eq!(outcome.matched.len(), records.len());
        assert_eq!(outcome.stats.active_filter_count, 0);
        assert_eq!(outcome.stats.original_total, records.len());
    }

    #[test]
    fn test_facet_excludes_absent_field() {
        let records = fixture();
        let spec = FilterSpec {
            abdc: vec!["A*".into()],
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key, "alpha finance");
    }

    #[test]
    fn test_conjunction() {
        let records = fixture();
        let spec = FilterSpec {
            abdc: vec!["A*".into()],
            predatory: Some(false),
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        // alpha finance has abdc A* and no predatory data (counts as false)
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key, "alpha finance");

        let spec = FilterSpec {
            abdc: vec!["A*".into()],
            predatory: Some(true),
            ..FilterSpec::default()
        };
        assert!(apply_filters(&records, &spec).matched.is_empty());
    }

    #[test]
    fn test_search_term_is_case_insensitive() {
        let records = fixture();
        let spec = FilterSpec {
            search_term: "ALPHA".into(),
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.matched.len(), 1);
    }

    #[test]
    fn test_numeric_range_excludes_missing_field() {
        let records = fixture();
        let spec = FilterSpec {
            min_cite_score: Some(1.0),
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        // Only gamma management carries CiteScore data
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key, "gamma management");
    }

    #[test]
    fn test_min_above_max_fails_closed() {
        let records = fixture();
        let spec = FilterSpec {
            min_cite_score: Some(10.0),
            max_cite_score: Some(1.0),
            ..FilterSpec::default()
        };
        assert!(apply_filters(&records, &spec).matched.is_empty());
    }

    #[test]
    fn test_h_index_bounds_inclusive() {
        let records = fixture();
        let spec = FilterSpec {
            min_h_index: Some(55),
            max_h_index: Some(55),
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.matched.len(), 1);
    }

    #[test]
    fn test_qualis_facet() {
        let records = fixture();
        let spec = FilterSpec {
            qualis: vec!["MB".into()],
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key, "alpha finance");

        // delta letters has no classifiable data at all
        let spec = FilterSpec {
            qualis: vec!["-".into()],
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key, "delta letters");
    }

    #[test]
    fn test_wiley_subject_facet() {
        let records = fixture();
        let spec = FilterSpec {
            wiley_subjects: vec!["Economics".into()],
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].key, "beta economics");
    }

    #[test]
    fn test_stats_distributions_over_matched_only() {
        let records = fixture();
        let spec = FilterSpec {
            abdc: vec!["A*".into(), "B".into()],
            ..FilterSpec::default()
        };
        let outcome = apply_filters(&records, &spec);
        assert_eq!(outcome.stats.total_results, 2);
        assert_eq!(outcome.stats.distributions.abdc.get("A*"), Some(&1));
        assert_eq!(outcome.stats.distributions.abdc.get("B"), Some(&1));
        assert!(outcome.stats.distributions.sjr_quartile.is_empty());
    }

    #[test]
    fn test_active_filter_count() {
        let spec = FilterSpec {
            search_term: "finance".into(),
            abdc: vec!["A".into()],
            min_cite_score: Some(2.0),
            max_cite_score: Some(8.0),
            predatory: Some(false),
            ..FilterSpec::default()
        };
        assert_eq!(spec.active_filter_count(), 5);
        assert!(spec.is_active());
        assert!(!FilterSpec::default().is_active());
    }

    #[test]
    fn test_preset_replaces_wholesale() {
        let prior = FilterSpec {
            search_term: "finance".into(),
            min_h_index: Some(100),
            ..FilterSpec::default()
        };
        let preset = FilterPreset::TopTier.spec();
        // The preset spec carries nothing over from the prior state
        assert_ne!(preset, prior);
        assert!(preset.search_term.is_empty());
        assert!(preset.min_h_index.is_none());
        assert_eq!(preset.abdc, vec!["A*".to_string()]);
        assert_eq!(preset.abs, vec!["4*".to_string()]);
    }

    #[test]
    fn test_preset_names_roundtrip() {
        for preset in FilterPreset::ALL {
            assert_eq!(FilterPreset::from_name(preset.name()), Some(preset));
        }
        assert_eq!(FilterPreset::from_name("nope"), None);
        assert_eq!(FilterPreset::Clear.spec(), FilterSpec::default());
    }
}
