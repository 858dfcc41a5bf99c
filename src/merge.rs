//! Multi-source merge engine.
//!
//! Takes the seven parsed `key -> fields` maps and produces one unified record
//! per journal key. Sources are applied in a fixed priority order and a lower
//! priority source never overwrites a field a higher one already set; since
//! every source owns its own field namespace this mostly means "first writer
//! wins", but the guard is what keeps the policy honest if layouts ever
//! overlap. The output is sorted by display name so repeated runs over the
//! same inputs are bit-identical.

use crate::model::{DataQuality, Source, UnifiedJournal};
use crate::normalize::to_display_name;
use crate::parser::SourceTables;
use crate::qualis;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Merge the seven source maps into the unified, sorted journal list.
///
/// Pure function: same tables in, same list out (content and order). Keys
/// normalizing to the empty string never enter the unified set. All seven
/// maps may be empty; the result is then legitimately empty.
pub fn merge(tables: &SourceTables) -> Vec<UnifiedJournal> {
    // BTreeSet gives a stable iteration order up front; the final sort is by
    // display name, which lowercases back to the key, so this is already the
    // output order.
    let mut all_keys: BTreeSet<&str> = BTreeSet::new();
    all_keys.extend(tables.abdc.keys().map(String::as_str));
    all_keys.extend(tables.abs.keys().map(String::as_str));
    all_keys.extend(tables.wiley.keys().map(String::as_str));
    all_keys.extend(tables.sjr.keys().map(String::as_str));
    all_keys.extend(tables.jcr.keys().map(String::as_str));
    all_keys.extend(tables.cite_score.keys().map(String::as_str));
    all_keys.extend(tables.predatory.keys().map(String::as_str));
    all_keys.remove("");

    debug!(unique_keys = all_keys.len(), "Collected union of source keys");

    let mut journals: Vec<UnifiedJournal> = all_keys
        .into_iter()
        .map(|key| build_record(key, tables))
        .collect();

    journals.sort_by(|a, b| {
        a.display_name
            .to_lowercase()
            .cmp(&b.display_name.to_lowercase())
    });

    info!(total = journals.len(), "Merge complete");
    journals
}

/// Build one unified record by visiting sources in priority order.
fn build_record(key: &str, tables: &SourceTables) -> UnifiedJournal {
    let mut journal = UnifiedJournal::new(key.to_string(), to_display_name(key));

    for source in Source::MERGE_ORDER {
        match source {
            Source::Abdc => {
                if let Some(rating) = tables.abdc.get(key) {
                    if journal.abdc.is_none() {
                        journal.abdc = Some(rating.clone());
                    }
                    journal.sources.push(Source::Abdc);
                }
            }
            Source::Abs => {
                if let Some(rating) = tables.abs.get(key) {
                    if journal.abs.is_none() {
                        journal.abs = Some(rating.clone());
                    }
                    journal.sources.push(Source::Abs);
                }
            }
            Source::Sjr => {
                if let Some(data) = tables.sjr.get(key) {
                    if journal.sjr.is_none() {
                        journal.sjr = Some(data.clone());
                    }
                    journal.sources.push(Source::Sjr);
                }
            }
            Source::Jcr => {
                if let Some(data) = tables.jcr.get(key) {
                    if journal.jcr.is_none() {
                        journal.jcr = Some(data.clone());
                    }
                    journal.sources.push(Source::Jcr);
                }
            }
            Source::CiteScore => {
                if let Some(data) = tables.cite_score.get(key) {
                    if journal.cite_score.is_none() {
                        journal.cite_score = Some(data.clone());
                    }
                    journal.sources.push(Source::CiteScore);
                }
            }
            Source::Wiley => {
                if let Some(data) = tables.wiley.get(key) {
                    if journal.wiley_subject.is_none() {
                        journal.wiley_subject = Some(data.subject_area.clone());
                        journal.wiley_apc = Some(data.apc_usd.clone());
                    }
                    // Wiley only counts as a contributing source when the
                    // subject area is non-empty
                    if !data.subject_area.is_empty() {
                        journal.sources.push(Source::Wiley);
                    }
                }
            }
            Source::Predatory => {
                if let Some(data) = tables.predatory.get(key) {
                    if journal.predatory.is_none() {
                        journal.predatory = Some(data.clone());
                    }
                    journal.sources.push(Source::Predatory);
                }
            }
        }
    }

    journal.data_quality = DataQuality::from_source_count(journal.sources.len());
    journal.qualis = qualis::recompute(&journal);
    journal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Quartile, Qualis, SjrData, WileyData};

    fn sjr_entry(quartile: Quartile, h_index: u32) -> SjrData {
        SjrData {
            quartile,
            score: 1.0,
            h_index,
            citable_docs: 100,
            year: 2024,
        }
    }

    #[test]
    fn test_union_completeness() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("journal a".into(), "A".into());
        tables.abs.insert("journal b".into(), "3".into());
        tables.sjr.insert("journal c".into(), sjr_entry(Quartile::Q2, 40));

        let merged = merge(&tables);
        let keys: Vec<&str> = merged.iter().map(|j| j.key.as_str()).collect();
        assert_eq!(keys, vec!["journal a", "journal b", "journal c"]);
    }

    #[test]
    fn test_shared_key_merges_into_one_record() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("journal x".into(), "A".into());
        tables.abs.insert("journal x".into(), "4".into());

        let merged = merge(&tables);
        assert_eq!(merged.len(), 1);
        let j = &merged[0];
        assert_eq!(j.abdc.as_deref(), Some("A"));
        assert_eq!(j.abs.as_deref(), Some("4"));
        assert_eq!(j.sources, vec![Source::Abdc, Source::Abs]);
        assert_eq!(j.data_quality, DataQuality::Medium);
        // abs=4 satisfies the MB rule
        assert_eq!(j.qualis, Qualis::Mb);
    }

    #[test]
    fn test_single_source_record_is_low_quality() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("lonely journal".into(), "C".into());

        let merged = merge(&tables);
        assert_eq!(merged[0].data_quality, DataQuality::Low);
        assert_eq!(merged[0].qualis, Qualis::R);
    }

    #[test]
    fn test_wiley_without_subject_is_not_a_source() {
        let mut tables = SourceTables::default();
        tables.wiley.insert(
            "apc only journal".into(),
            WileyData {
                subject_area: String::new(),
                apc_usd: "2000".into(),
            },
        );

        let merged = merge(&tables);
        let j = &merged[0];
        // The APC field is still carried, but Wiley did not contribute
        assert_eq!(j.wiley_apc.as_deref(), Some("2000"));
        assert!(j.sources.is_empty());
        assert_eq!(j.data_quality, DataQuality::Low);
    }

    #[test]
    fn test_empty_key_never_merged() {
        let mut tables = SourceTables::default();
        tables.abdc.insert(String::new(), "A".into());
        tables.abs.insert("real journal".into(), "1".into());

        let merged = merge(&tables);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].key, "real journal");
    }

    #[test]
    fn test_empty_input_is_empty_output() {
        assert!(merge(&SourceTables::default()).is_empty());
    }

    #[test]
    fn test_idempotence() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("journal b".into(), "B".into());
        tables.abdc.insert("journal a".into(), "A*".into());
        tables.sjr.insert("journal a".into(), sjr_entry(Quartile::Q4, 15));
        tables.predatory.insert(
            "journal b".into(),
            crate::model::PredatoryData {
                is_predatory: true,
                source: "Beall".into(),
                reason: String::new(),
                last_checked: "2024-01-01".into(),
            },
        );

        let first = merge(&tables);
        let second = merge(&tables);
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_sorted_by_display_name() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("zeta review".into(), "B".into());
        tables.abdc.insert("alpha journal".into(), "A".into());
        tables.abdc.insert("mid journal".into(), "C".into());

        let merged = merge(&tables);
        let names: Vec<&str> = merged.iter().map(|j| j.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Journal", "Mid Journal", "Zeta Review"]);
    }

    #[test]
    fn test_three_sources_is_high_quality() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("journal x".into(), "A*".into());
        tables.abs.insert("journal x".into(), "4*".into());
        tables.sjr.insert("journal x".into(), sjr_entry(Quartile::Q1, 200));

        let merged = merge(&tables);
        assert_eq!(merged[0].data_quality, DataQuality::High);
        assert_eq!(merged[0].sources.len(), 3);
    }

    #[test]
    fn test_qualis_stored_matches_recompute() {
        let mut tables = SourceTables::default();
        tables.abdc.insert("journal x".into(), "A*".into());
        tables.sjr.insert("journal x".into(), sjr_entry(Quartile::Q4, 10));

        let merged = merge(&tables);
        // Rule 1 short-circuits the SJR Q4
        assert_eq!(merged[0].qualis, Qualis::Mb);
        assert_eq!(qualis::recompute(&merged[0]), merged[0].qualis);
    }
}
