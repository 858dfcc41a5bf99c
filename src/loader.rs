//! Source-extract loading and orchestration.
//!
//! Reads the seven per-source CSV extracts from disk and runs their parsers.
//! The seven loads are independent and run concurrently. A failed source is
//! surfaced as a warning and contributes an empty map - missing one of seven
//! sources must never block producing a unified result from the other six.

use crate::error::{JournalScopeError, Result};
use crate::merge;
use crate::model::{Source, UnifiedJournal};
use crate::parser::{self, RawRow, SourceTables};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default extract file names inside a data directory
const FILE_NAMES: [(Source, &str); 7] = [
    (Source::Abdc, "abdc.csv"),
    (Source::Abs, "abs.csv"),
    (Source::Sjr, "sjr.csv"),
    (Source::Jcr, "jcr.csv"),
    (Source::CiteScore, "citescore.csv"),
    (Source::Wiley, "wiley.csv"),
    (Source::Predatory, "predatory.csv"),
];

/// Locations of the seven source extracts
#[derive(Debug, Clone)]
pub struct SourcePaths {
    pub abdc: PathBuf,
    pub abs: PathBuf,
    pub sjr: PathBuf,
    pub jcr: PathBuf,
    pub cite_score: PathBuf,
    pub wiley: PathBuf,
    pub predatory: PathBuf,
}

impl SourcePaths {
    /// Conventional layout: all seven extracts under one directory
    pub fn in_dir(dir: &Path) -> Self {
        let join = |name: &str| dir.join(name);
        SourcePaths {
            abdc: join("abdc.csv"),
            abs: join("abs.csv"),
            sjr: join("sjr.csv"),
            jcr: join("jcr.csv"),
            cite_score: join("citescore.csv"),
            wiley: join("wiley.csv"),
            predatory: join("predatory.csv"),
        }
    }

    /// Expected file name for a source, for user-facing messages
    pub fn file_name(source: Source) -> &'static str {
        FILE_NAMES
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, name)| *name)
            .unwrap_or("unknown.csv")
    }
}

/// Which sources loaded and which degraded to an empty map
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<Source>,
    pub failed: Vec<(Source, String)>,
}

impl LoadReport {
    fn record<T>(&mut self, source: Source, result: Result<T>, on_ok: impl FnOnce(T)) {
        match result {
            Ok(value) => {
                self.loaded.push(source);
                on_ok(value);
            }
            Err(e) => {
                warn!(source = %source, error = %e, "Source degraded to empty map");
                self.failed.push((source, e.to_string()));
            }
        }
    }
}

/// Read a CSV extract into raw rows.
///
/// Headers are not interpreted here; the per-source parsers locate their own
/// data region. A missing or unreadable file is a `SourceUnavailable` error.
fn read_rows(path: &Path, source: &'static str) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| JournalScopeError::SourceUnavailable {
            source_name: source,
            reason: format!("{}: {}", path.display(), e),
        })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(rows)
}

/// Read-and-parse off the async runtime's blocking pool
async fn load_rows(path: &Path, source: &'static str) -> Result<Vec<RawRow>> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_rows(&path, source))
        .await
        .map_err(|e| JournalScopeError::Config(format!("Load task for {} failed: {}", source, e)))?
}

/// Load all seven source extracts concurrently.
///
/// Every failure degrades that source to an empty map and is recorded in the
/// report; the returned tables are always fully formed.
pub async fn load_all(paths: &SourcePaths) -> (SourceTables, LoadReport) {
    let (abdc, abs, sjr, jcr, cite_score, wiley, predatory) = futures::join!(
        async { parser::parse_abdc(&load_rows(&paths.abdc, "ABDC").await?) },
        async { parser::parse_abs(&load_rows(&paths.abs, "ABS").await?) },
        async { parser::parse_sjr(&load_rows(&paths.sjr, "SJR").await?) },
        async { parser::parse_jcr(&load_rows(&paths.jcr, "JCR").await?) },
        async { parser::parse_cite_score(&load_rows(&paths.cite_score, "CiteScore").await?) },
        async { parser::parse_wiley(&load_rows(&paths.wiley, "Wiley").await?) },
        async { parser::parse_predatory(&load_rows(&paths.predatory, "Predatory").await?) },
    );

    let mut tables = SourceTables::default();
    let mut report = LoadReport::default();
    report.record(Source::Abdc, abdc, |map| tables.abdc = map);
    report.record(Source::Abs, abs, |map| tables.abs = map);
    report.record(Source::Sjr, sjr, |map| tables.sjr = map);
    report.record(Source::Jcr, jcr, |map| tables.jcr = map);
    report.record(Source::CiteScore, cite_score, |map| tables.cite_score = map);
    report.record(Source::Wiley, wiley, |map| tables.wiley = map);
    report.record(Source::Predatory, predatory, |map| tables.predatory = map);

    info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        "Source load complete"
    );

    (tables, report)
}

/// Load all sources and run the merge in one call.
pub async fn load_and_merge(paths: &SourcePaths) -> (Vec<UnifiedJournal>, LoadReport) {
    let (tables, report) = load_all(paths).await;
    (merge::merge(&tables), report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).expect("create file");
        file.write_all(content.as_bytes()).expect("write file");
    }

    fn seed_data_dir(dir: &Path) {
        write_file(
            dir,
            "abdc.csv",
            "ABDC Journal Quality List,,,,,,\n\
             Journal Title,Publisher,ISSN,ISSN Online,Year,FoR,Rating\n\
             Journal of Finance,Wiley,,,,,A*\n\
             Beta Economics,,,,,,B\n",
        );
        write_file(
            dir,
            "abs.csv",
            "Field,Journal Title,AJG 2024\n\
             FIN,Journal of Finance,4*\n",
        );
        write_file(
            dir,
            "sjr.csv",
            "Title,Quartile,SJR,H index,Citable Docs,Year\n\
             Journal of Finance,Q1,8.5,250,400,2024\n",
        );
    }

    #[tokio::test]
    async fn test_missing_sources_degrade_gracefully() {
        let temp = tempfile::tempdir().expect("tempdir");
        seed_data_dir(temp.path());
        let paths = SourcePaths::in_dir(temp.path());

        let (tables, report) = load_all(&paths).await;

        assert_eq!(report.loaded.len(), 3);
        assert_eq!(report.failed.len(), 4);
        assert_eq!(tables.abdc.len(), 2);
        assert_eq!(tables.abs.len(), 1);
        assert!(tables.wiley.is_empty());
        assert!(tables.predatory.is_empty());
    }

    #[tokio::test]
    async fn test_load_and_merge_end_to_end() {
        let temp = tempfile::tempdir().expect("tempdir");
        seed_data_dir(temp.path());
        let paths = SourcePaths::in_dir(temp.path());

        let (journals, _report) = load_and_merge(&paths).await;

        assert_eq!(journals.len(), 2);
        let jof = journals
            .iter()
            .find(|j| j.key == "journal of finance")
            .expect("journal of finance");
        assert_eq!(jof.abdc.as_deref(), Some("A*"));
        assert_eq!(jof.abs.as_deref(), Some("4*"));
        assert_eq!(jof.sources.len(), 3);
        // No Wiley extract was present, so no record carries a subject
        assert!(journals.iter().all(|j| j.wiley_subject.is_none()));
    }

    #[tokio::test]
    async fn test_malformed_extract_degrades() {
        let temp = tempfile::tempdir().expect("tempdir");
        // ABDC extract without the "Journal Title" sentinel
        write_file(temp.path(), "abdc.csv", "Wrong,Header\nSome Journal,A\n");
        let paths = SourcePaths::in_dir(temp.path());

        let (tables, report) = load_all(&paths).await;
        assert!(tables.abdc.is_empty());
        let abdc_failure = report
            .failed
            .iter()
            .find(|(s, _)| *s == Source::Abdc)
            .expect("abdc failure recorded");
        assert!(abdc_failure.1.contains("Journal Title"));
    }
}
