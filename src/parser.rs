//! Per-source record parsers.
//!
//! Each of the seven sources ships a spreadsheet extract with its own column
//! layout. The cell-extraction layer hands us raw rows (lists of cell strings);
//! this module locates the data region, maps columns to fields and keys every
//! entry by the normalized journal title. Rows without a usable title are
//! expected noise in spreadsheet exports and are skipped silently; a missing
//! header sentinel or a near-empty sheet is a structural error that names the
//! offending source.

use crate::error::{JournalScopeError, Result};
use crate::model::{CiteScoreData, JcrData, PredatoryData, Quartile, SjrData, WileyData};
use crate::normalize::normalize_key;
use std::collections::HashMap;
use tracing::debug;

/// One spreadsheet row as extracted cell strings
pub type RawRow = Vec<String>;

/// Header cell text that marks the start of ABDC and Wiley data regions
pub const HEADER_SENTINEL: &str = "Journal Title";

// Column layouts per source extract
mod columns {
    pub mod abdc {
        pub const JOURNAL_TITLE: usize = 0;
        pub const RATING: usize = 6;
    }
    pub mod abs {
        pub const JOURNAL_TITLE: usize = 1;
        pub const AJG_2024: usize = 2;
    }
    pub mod wiley {
        pub const JOURNAL_TITLE: usize = 0;
        pub const SUBJECT_AREA: usize = 2;
        pub const APC_USD: usize = 4;
    }
    pub mod sjr {
        pub const JOURNAL_TITLE: usize = 0;
        pub const QUARTILE: usize = 1;
        pub const SCORE: usize = 2;
        pub const H_INDEX: usize = 3;
        pub const CITABLE_DOCS: usize = 4;
        pub const YEAR: usize = 5;
    }
    pub mod jcr {
        pub const JOURNAL_TITLE: usize = 0;
        pub const IMPACT_FACTOR: usize = 1;
        pub const QUARTILE: usize = 2;
        pub const CATEGORY: usize = 3;
        pub const CITATIONS: usize = 4;
        pub const YEAR: usize = 5;
    }
    pub mod cite_score {
        pub const JOURNAL_TITLE: usize = 0;
        pub const SCORE: usize = 1;
        pub const PERCENTILE: usize = 2;
        pub const CITATIONS: usize = 3;
        pub const YEAR: usize = 4;
    }
    pub mod predatory {
        pub const JOURNAL_TITLE: usize = 0;
        pub const SOURCE: usize = 1;
        pub const REASON: usize = 2;
        pub const LAST_CHECKED: usize = 3;
    }
}

/// The seven parsed source maps, all keyed by normalized journal title.
///
/// A failed source is represented by its empty map, never by a partial one;
/// the merge then simply sees no contribution from it.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub abdc: HashMap<String, String>,
    pub abs: HashMap<String, String>,
    pub wiley: HashMap<String, WileyData>,
    pub sjr: HashMap<String, SjrData>,
    pub jcr: HashMap<String, JcrData>,
    pub cite_score: HashMap<String, CiteScoreData>,
    pub predatory: HashMap<String, PredatoryData>,
}

/// Cell accessor: out-of-range columns read as empty
fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("").trim()
}

/// Parse a numeric cell, tolerating thousands separators; missing/invalid is 0
fn cell_f64(row: &[String], idx: usize) -> f64 {
    cell(row, idx).replace(',', "").parse().unwrap_or(0.0)
}

fn cell_u64(row: &[String], idx: usize) -> u64 {
    cell(row, idx).replace(',', "").parse().unwrap_or(0)
}

fn cell_u32(row: &[String], idx: usize) -> u32 {
    cell(row, idx).replace(',', "").parse().unwrap_or(0)
}

fn cell_i32(row: &[String], idx: usize) -> i32 {
    cell(row, idx).parse().unwrap_or(0)
}

/// Locate the first row whose title column equals the header sentinel.
/// Data starts on the following row.
fn find_data_start(rows: &[RawRow], title_col: usize, source: &'static str) -> Result<usize> {
    rows.iter()
        .position(|row| cell(row, title_col) == HEADER_SENTINEL)
        .map(|i| i + 1)
        .ok_or_else(|| JournalScopeError::SheetFormat {
            source_name: source,
            reason: format!("header cell \"{}\" not found", HEADER_SENTINEL),
        })
}

/// Sources without a sentinel start right after row 0 and must have at least
/// one data row below the header.
fn require_min_rows(rows: &[RawRow], source: &'static str) -> Result<()> {
    if rows.len() < 2 {
        return Err(JournalScopeError::SheetFormat {
            source_name: source,
            reason: format!("expected header plus data, found {} rows", rows.len()),
        });
    }
    Ok(())
}

/// Parse the ABDC extract into `key -> rating` (A*, A, B, C).
pub fn parse_abdc(rows: &[RawRow]) -> Result<HashMap<String, String>> {
    let start = find_data_start(rows, columns::abdc::JOURNAL_TITLE, "ABDC")?;

    let mut journals = HashMap::new();
    let mut skipped = 0usize;
    for row in &rows[start..] {
        let key = normalize_key(cell(row, columns::abdc::JOURNAL_TITLE));
        let rating = cell(row, columns::abdc::RATING);
        if key.is_empty() || rating.is_empty() {
            skipped += 1;
            continue;
        }
        journals.insert(key, rating.to_string());
    }

    debug!(count = journals.len(), skipped, "Parsed ABDC extract");
    Ok(journals)
}

/// Parse the ABS extract into `key -> AJG 2024 rating` (4*, 4, 3, 2, 1).
pub fn parse_abs(rows: &[RawRow]) -> Result<HashMap<String, String>> {
    require_min_rows(rows, "ABS")?;

    let mut journals = HashMap::new();
    for row in &rows[1..] {
        let key = normalize_key(cell(row, columns::abs::JOURNAL_TITLE));
        let rating = cell(row, columns::abs::AJG_2024);
        if key.is_empty() || rating.is_empty() {
            continue;
        }
        journals.insert(key, rating.to_string());
    }

    debug!(count = journals.len(), "Parsed ABS extract");
    Ok(journals)
}

/// Parse the Wiley extract into `key -> {subject_area, apc_usd}`.
///
/// A row with a title but no subject is kept: the APC may still be present,
/// and the merge decides whether Wiley counts as a contributing source.
pub fn parse_wiley(rows: &[RawRow]) -> Result<HashMap<String, WileyData>> {
    let start = find_data_start(rows, columns::wiley::JOURNAL_TITLE, "Wiley")?;

    let mut journals = HashMap::new();
    for row in &rows[start..] {
        let key = normalize_key(cell(row, columns::wiley::JOURNAL_TITLE));
        if key.is_empty() {
            continue;
        }
        journals.insert(
            key,
            WileyData {
                subject_area: cell(row, columns::wiley::SUBJECT_AREA).to_string(),
                apc_usd: cell(row, columns::wiley::APC_USD).to_string(),
            },
        );
    }

    debug!(count = journals.len(), "Parsed Wiley extract");
    Ok(journals)
}

/// Parse the SJR extract. Rows whose quartile cell is not Q1..Q4 are skipped.
pub fn parse_sjr(rows: &[RawRow]) -> Result<HashMap<String, SjrData>> {
    require_min_rows(rows, "SJR")?;

    let mut journals = HashMap::new();
    let mut skipped = 0usize;
    for row in &rows[1..] {
        let key = normalize_key(cell(row, columns::sjr::JOURNAL_TITLE));
        let quartile = Quartile::parse(cell(row, columns::sjr::QUARTILE));
        let (key, quartile) = match (key.is_empty(), quartile) {
            (false, Some(q)) => (key, q),
            _ => {
                skipped += 1;
                continue;
            }
        };
        journals.insert(
            key,
            SjrData {
                quartile,
                score: cell_f64(row, columns::sjr::SCORE),
                h_index: cell_u32(row, columns::sjr::H_INDEX),
                citable_docs: cell_u32(row, columns::sjr::CITABLE_DOCS),
                year: cell_i32(row, columns::sjr::YEAR),
            },
        );
    }

    debug!(count = journals.len(), skipped, "Parsed SJR extract");
    Ok(journals)
}

/// Parse the JCR extract. The quartile is kept as a raw string.
pub fn parse_jcr(rows: &[RawRow]) -> Result<HashMap<String, JcrData>> {
    require_min_rows(rows, "JCR")?;

    let mut journals = HashMap::new();
    for row in &rows[1..] {
        let key = normalize_key(cell(row, columns::jcr::JOURNAL_TITLE));
        if key.is_empty() {
            continue;
        }
        journals.insert(
            key,
            JcrData {
                impact_factor: cell_f64(row, columns::jcr::IMPACT_FACTOR),
                quartile: cell(row, columns::jcr::QUARTILE).to_string(),
                category: cell(row, columns::jcr::CATEGORY).to_string(),
                citations: cell_u64(row, columns::jcr::CITATIONS),
                year: cell_i32(row, columns::jcr::YEAR),
            },
        );
    }

    debug!(count = journals.len(), "Parsed JCR extract");
    Ok(journals)
}

/// Parse the CiteScore extract.
pub fn parse_cite_score(rows: &[RawRow]) -> Result<HashMap<String, CiteScoreData>> {
    require_min_rows(rows, "CiteScore")?;

    let mut journals = HashMap::new();
    for row in &rows[1..] {
        let key = normalize_key(cell(row, columns::cite_score::JOURNAL_TITLE));
        if key.is_empty() {
            continue;
        }
        journals.insert(
            key,
            CiteScoreData {
                score: cell_f64(row, columns::cite_score::SCORE),
                percentile: cell_f64(row, columns::cite_score::PERCENTILE),
                citations: cell_u64(row, columns::cite_score::CITATIONS),
                year: cell_i32(row, columns::cite_score::YEAR),
            },
        );
    }

    debug!(count = journals.len(), "Parsed CiteScore extract");
    Ok(journals)
}

/// Parse the predatory-journal watchlist. Listed means flagged.
pub fn parse_predatory(rows: &[RawRow]) -> Result<HashMap<String, PredatoryData>> {
    require_min_rows(rows, "Predatory")?;

    let mut journals = HashMap::new();
    for row in &rows[1..] {
        let key = normalize_key(cell(row, columns::predatory::JOURNAL_TITLE));
        if key.is_empty() {
            continue;
        }
        let source = cell(row, columns::predatory::SOURCE);
        journals.insert(
            key,
            PredatoryData {
                is_predatory: true,
                source: if source.is_empty() { "Unknown".to_string() } else { source.to_string() },
                reason: cell(row, columns::predatory::REASON).to_string(),
                last_checked: cell(row, columns::predatory::LAST_CHECKED).to_string(),
            },
        );
    }

    debug!(count = journals.len(), "Parsed predatory watchlist");
    Ok(journals)
}
