//! Type-aware sorting of unified records.
//!
//! Ordinal rating scales sort by their fixed rank tables rather than lexically
//! (so "A*" outranks "A" and "4*" outranks "4"); numeric fields parse to
//! numbers with missing or unparseable values treated as 0; everything else
//! compares case-insensitively. Ties always break by display name ascending so
//! a paginated "load more" never reshuffles.

use crate::model::UnifiedJournal;
use std::cmp::Ordering;

/// Sortable fields, covering raw and derived columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    DisplayName,
    Abdc,
    Abs,
    Qualis,
    DataQuality,
    WileySubject,
    WileyApc,
    CiteScore,
    HIndex,
    ImpactFactor,
}

impl SortField {
    pub fn name(&self) -> &'static str {
        match self {
            SortField::DisplayName => "name",
            SortField::Abdc => "abdc",
            SortField::Abs => "abs",
            SortField::Qualis => "qualis",
            SortField::DataQuality => "data-quality",
            SortField::WileySubject => "wiley-subject",
            SortField::WileyApc => "wiley-apc",
            SortField::CiteScore => "cite-score",
            SortField::HIndex => "h-index",
            SortField::ImpactFactor => "impact-factor",
        }
    }

    pub fn from_name(name: &str) -> Option<SortField> {
        [
            SortField::DisplayName,
            SortField::Abdc,
            SortField::Abs,
            SortField::Qualis,
            SortField::DataQuality,
            SortField::WileySubject,
            SortField::WileyApc,
            SortField::CiteScore,
            SortField::HIndex,
            SortField::ImpactFactor,
        ]
        .into_iter()
        .find(|f| f.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// ABDC rank table: A*=4, A=3, B=2, C=1, absent/unknown=0
fn abdc_rank(rating: Option<&str>) -> u8 {
    match rating {
        Some("A*") => 4,
        Some("A") => 3,
        Some("B") => 2,
        Some("C") => 1,
        _ => 0,
    }
}

/// ABS rank table: 4*=5 down to 1=1, absent/unknown=0
fn abs_rank(rating: Option<&str>) -> u8 {
    match rating {
        Some("4*") => 5,
        Some("4") => 4,
        Some("3") => 3,
        Some("2") => 2,
        Some("1") => 1,
        _ => 0,
    }
}

/// data quality ordered high > medium > low
fn quality_rank(journal: &UnifiedJournal) -> u8 {
    match journal.data_quality {
        crate::model::DataQuality::High => 3,
        crate::model::DataQuality::Medium => 2,
        crate::model::DataQuality::Low => 1,
    }
}

/// Numeric parse for the APC cell; missing/non-numeric is 0
fn apc_value(journal: &UnifiedJournal) -> f64 {
    journal
        .wiley_apc
        .as_deref()
        .and_then(|a| a.replace(',', "").parse().ok())
        .unwrap_or(0.0)
}

fn compare_by(field: SortField, a: &UnifiedJournal, b: &UnifiedJournal) -> Ordering {
    match field {
        SortField::DisplayName => a
            .display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase()),
        SortField::Abdc => abdc_rank(a.abdc.as_deref()).cmp(&abdc_rank(b.abdc.as_deref())),
        SortField::Abs => abs_rank(a.abs.as_deref()).cmp(&abs_rank(b.abs.as_deref())),
        SortField::Qualis => a.qualis.rank().cmp(&b.qualis.rank()),
        SortField::DataQuality => quality_rank(a).cmp(&quality_rank(b)),
        SortField::WileySubject => a
            .wiley_subject
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .cmp(&b.wiley_subject.as_deref().unwrap_or("").to_lowercase()),
        SortField::WileyApc => apc_value(a).total_cmp(&apc_value(b)),
        SortField::CiteScore => {
            let a_score = a.cite_score.as_ref().map(|c| c.score).unwrap_or(0.0);
            let b_score = b.cite_score.as_ref().map(|c| c.score).unwrap_or(0.0);
            a_score.total_cmp(&b_score)
        }
        SortField::HIndex => {
            let a_h = a.sjr.as_ref().map(|s| s.h_index).unwrap_or(0);
            let b_h = b.sjr.as_ref().map(|s| s.h_index).unwrap_or(0);
            a_h.cmp(&b_h)
        }
        SortField::ImpactFactor => {
            let a_if = a.jcr.as_ref().map(|j| j.impact_factor).unwrap_or(0.0);
            let b_if = b.jcr.as_ref().map(|j| j.impact_factor).unwrap_or(0.0);
            a_if.total_cmp(&b_if)
        }
    }
}

/// Sort records in place by `field` and `direction`.
///
/// The direction flips only the primary comparison; ties break by display
/// name ascending regardless, keeping the order deterministic.
pub fn sort_records(records: &mut [&UnifiedJournal], field: SortField, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare_by(field, a, b);
        let ord = match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then_with(|| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
        })
    });
}
