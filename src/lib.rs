//! # journalscope
//!
//! Unified academic journal quality ratings - multi-source merge and query engine
//!
//! ## Modules
//!
//! - [`loader`] - Concurrent loading of the seven source extracts
//! - [`parser`] - Per-source spreadsheet extract parsers
//! - [`normalize`] - Title normalization and display-name derivation
//! - [`merge`] - Priority merge into unified journal records
//! - [`qualis`] - Composite Qualis tier derivation
//! - [`filter`] - Filter engine and presets
//! - [`sort`] - Type-aware sorting
//! - [`paginate`] - Result windowing
//! - [`similar`] - Word-overlap similar-journal lookup
//! - [`stats`] - Coverage and distribution statistics
//! - [`export`] - CSV/JSON export
//! - [`cache`] - Merge-output cache persistence
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use journalscope::{loader, filter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let paths = loader::SourcePaths::in_dir(std::path::Path::new("data"));
//!     let (journals, _report) = loader::load_and_merge(&paths).await;
//!     let outcome = filter::apply_filters(&journals, &filter::FilterSpec::default());
//!     println!("{} journals match", outcome.stats.total_results);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod paginate;
pub mod parser;
pub mod qualis;
pub mod similar;
pub mod sort;
pub mod stats;

pub use error::{JournalScopeError, Result};
