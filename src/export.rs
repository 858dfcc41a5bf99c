//! Flat-file export of unified records and statistics.
//!
//! CSV export flattens each record to one row of scalar columns; nested
//! per-source structs collapse to their headline values. JSON export keeps
//! the full record shape.

use crate::error::Result;
use crate::model::UnifiedJournal;
use crate::stats::UnifiedStats;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One flattened CSV row per unified journal
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    abdc: &'a str,
    abs: &'a str,
    qualis: &'a str,
    sjr_quartile: String,
    sjr_score: String,
    h_index: String,
    jcr_impact_factor: String,
    jcr_quartile: &'a str,
    cite_score: String,
    cite_score_percentile: String,
    wiley_subject: &'a str,
    wiley_apc_usd: &'a str,
    predatory: &'a str,
    data_quality: &'a str,
    sources: String,
}

impl<'a> ExportRow<'a> {
    fn from_journal(journal: &'a UnifiedJournal) -> Self {
        ExportRow {
            name: &journal.display_name,
            abdc: journal.abdc.as_deref().unwrap_or(""),
            abs: journal.abs.as_deref().unwrap_or(""),
            qualis: journal.qualis.as_str(),
            sjr_quartile: journal
                .sjr_quartile()
                .map(|q| q.as_str().to_string())
                .unwrap_or_default(),
            sjr_score: journal
                .sjr
                .as_ref()
                .map(|s| s.score.to_string())
                .unwrap_or_default(),
            h_index: journal
                .sjr
                .as_ref()
                .map(|s| s.h_index.to_string())
                .unwrap_or_default(),
            jcr_impact_factor: journal
                .jcr
                .as_ref()
                .map(|j| j.impact_factor.to_string())
                .unwrap_or_default(),
            jcr_quartile: journal.jcr.as_ref().map(|j| j.quartile.as_str()).unwrap_or(""),
            cite_score: journal
                .cite_score
                .as_ref()
                .map(|c| c.score.to_string())
                .unwrap_or_default(),
            cite_score_percentile: journal
                .cite_score
                .as_ref()
                .map(|c| c.percentile.to_string())
                .unwrap_or_default(),
            wiley_subject: journal.wiley_subject.as_deref().unwrap_or(""),
            wiley_apc_usd: journal.wiley_apc.as_deref().unwrap_or(""),
            predatory: if journal.is_predatory() { "yes" } else { "" },
            data_quality: journal.data_quality.as_str(),
            sources: journal
                .sources
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Write records as a flat CSV file with a header row.
pub fn write_csv<'a>(
    records: impl IntoIterator<Item = &'a UnifiedJournal>,
    path: &Path,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_path(path)?;
    let mut count = 0usize;
    for journal in records {
        wtr.serialize(ExportRow::from_journal(journal))?;
        count += 1;
    }
    wtr.flush()?;
    info!("Exported {} journals to {:?}", count, path);
    Ok(())
}

/// Write records as pretty-printed JSON, full record shape.
pub fn write_json<'a>(
    records: impl IntoIterator<Item = &'a UnifiedJournal>,
    path: &Path,
) -> Result<()> {
    let records: Vec<&UnifiedJournal> = records.into_iter().collect();
    let content = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, content)?;
    info!("Exported {} journals to {:?}", records.len(), path);
    Ok(())
}

/// Write a statistics summary as pretty-printed JSON.
pub fn write_stats_json(stats: &UnifiedStats, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    std::fs::write(path, content)?;
    info!("Exported statistics to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::merge;
    use crate::model::{Quartile, SjrData};
    use crate::parser::SourceTables;
    use crate::stats::unified_stats;

    fn fixture() -> Vec<UnifiedJournal> {
        let mut tables = SourceTables::default();
        tables.abdc.insert("journal of finance".into(), "A*".into());
        tables.sjr.insert(
            "journal of finance".into(),
            SjrData {
                quartile: Quartile::Q1,
                score: 8.5,
                h_index: 250,
                citable_docs: 400,
                year: 2024,
            },
        );
        tables.abdc.insert("beta economics".into(), "B".into());
        merge(&tables)
    }

    #[test]
    fn test_csv_export_shape() -> Result<()> {
        let records = fixture();
        let temp = tempfile::NamedTempFile::new()?;
        write_csv(records.iter(), temp.path())?;

        let content = std::fs::read_to_string(temp.path())?;
        let mut lines = content.lines();
        let header = lines.next().expect("header row");
        assert!(header.starts_with("name,abdc,abs,qualis"));
        // Sorted merge output: beta before journal of finance
        let first = lines.next().expect("first data row");
        assert!(first.starts_with("Beta Economics,B,"));
        let second = lines.next().expect("second data row");
        assert!(second.contains("Journal OF Finance"));
        assert!(second.contains("Q1"));
        assert!(second.contains("250"));
        Ok(())
    }

    #[test]
    fn test_json_export_roundtrip() -> Result<()> {
        let records = fixture();
        let temp = tempfile::NamedTempFile::new()?;
        write_json(records.iter(), temp.path())?;

        let content = std::fs::read_to_string(temp.path())?;
        let parsed: Vec<UnifiedJournal> = serde_json::from_str(&content)?;
        assert_eq!(parsed, records);
        Ok(())
    }

    #[test]
    fn test_stats_export() -> Result<()> {
        let records = fixture();
        let temp = tempfile::NamedTempFile::new()?;
        write_stats_json(&unified_stats(&records), temp.path())?;

        let content = std::fs::read_to_string(temp.path())?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(value["total"], 2);
        assert_eq!(value["bySource"]["abdc"], 2);
        Ok(())
    }
}
