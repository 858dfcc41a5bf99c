//! Aggregate statistics over unified journal records.
//!
//! Distributions use `BTreeMap` so serialized output is deterministic.

use crate::model::UnifiedJournal;
use serde::Serialize;
use std::collections::BTreeMap;

/// Value-frequency distributions shared by the whole-set summary and the
/// filter engine's per-result stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    pub abdc: BTreeMap<String, usize>,
    pub abs: BTreeMap<String, usize>,
    pub sjr_quartile: BTreeMap<String, usize>,
    pub data_quality: BTreeMap<String, usize>,
}

impl Distributions {
    /// Count one record into every dimension it has data for
    pub fn observe(&mut self, journal: &UnifiedJournal) {
        if let Some(rating) = &journal.abdc {
            *self.abdc.entry(rating.clone()).or_insert(0) += 1;
        }
        if let Some(rating) = &journal.abs {
            *self.abs.entry(rating.clone()).or_insert(0) += 1;
        }
        if let Some(quartile) = journal.sjr_quartile() {
            *self.sjr_quartile.entry(quartile.as_str().to_string()).or_insert(0) += 1;
        }
        *self
            .data_quality
            .entry(journal.data_quality.as_str().to_string())
            .or_insert(0) += 1;
    }
}

/// How many records each source contributed to
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCoverage {
    pub abdc: usize,
    pub abs: usize,
    pub sjr: usize,
    pub jcr: usize,
    pub cite_score: usize,
    pub wiley: usize,
    pub predatory: usize,
}

impl SourceCoverage {
    pub fn observe(&mut self, journal: &UnifiedJournal) {
        if journal.abdc.is_some() {
            self.abdc += 1;
        }
        if journal.abs.is_some() {
            self.abs += 1;
        }
        if journal.sjr.is_some() {
            self.sjr += 1;
        }
        if journal.jcr.is_some() {
            self.jcr += 1;
        }
        if journal.cite_score.is_some() {
            self.cite_score += 1;
        }
        if journal.wiley_subject.as_deref().map(|s| !s.is_empty()).unwrap_or(false) {
            self.wiley += 1;
        }
        if journal.predatory.is_some() {
            self.predatory += 1;
        }
    }
}

/// Summary of the parseable Wiley APC values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApcStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
}

impl ApcStats {
    fn from_values(mut values: Vec<f64>) -> ApcStats {
        if values.is_empty() {
            return ApcStats::default();
        }
        values.sort_by(f64::total_cmp);
        let count = values.len();
        let sum: f64 = values.iter().sum();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (values[mid - 1] + values[mid]) / 2.0
        } else {
            values[mid]
        };
        ApcStats {
            count,
            min: values[0],
            max: values[count - 1],
            mean: sum / count as f64,
            median,
        }
    }
}

/// Full statistics over a unified record set
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedStats {
    pub total: usize,
    pub by_source: SourceCoverage,
    pub distributions: Distributions,
    pub wiley_subjects: BTreeMap<String, usize>,
    pub apc: ApcStats,
}

/// Compute coverage, distributions and APC summary in one pass.
pub fn unified_stats(records: &[UnifiedJournal]) -> UnifiedStats {
    let mut stats = UnifiedStats {
        total: records.len(),
        ..UnifiedStats::default()
    };
    let mut apc_values = Vec::new();

    for journal in records {
        stats.by_source.observe(journal);
        stats.distributions.observe(journal);
        if let Some(subject) = journal.wiley_subject.as_deref().filter(|s| !s.is_empty()) {
            *stats.wiley_subjects.entry(subject.to_string()).or_insert(0) += 1;
        }
        if let Some(apc) = journal.wiley_apc.as_deref() {
            if let Ok(value) = apc.replace(',', "").parse::<f64>() {
                apc_values.push(value);
            }
        }
    }

    stats.apc = ApcStats::from_values(apc_values);
    stats
}
