//! journalscope - Unified academic journal quality ratings
//!
//! Merges seven rating-source extracts (ABDC, ABS, SJR, JCR, CiteScore,
//! Wiley, Predatory) into one deduplicated journal list and answers
//! filter/sort/similarity queries over it.
//!
//! ## Usage
//!
//! ### CLI Mode
//! ```bash
//! journalscope query --data-dir ./data --preset top-tier --sort cite-score --desc
//! ```
//!
//! ### HTTP Server Mode
//! ```bash
//! journalscope serve --data-dir ./data --port 3000
//! ```

use anyhow::{Context, Result};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Duration;
use clap::{Parser, Subcommand};
use journalscope::{
    cache::{CacheManager, DEFAULT_MAX_AGE_HOURS},
    export,
    filter::{apply_filters, FilterPreset, FilterSpec, FilterStats},
    loader::{self, SourcePaths},
    model::UnifiedJournal,
    paginate::{paginate, Page},
    similar,
    sort::{sort_records, SortDirection, SortField},
    stats::unified_stats,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// ============================================================================
// CLI Definition
// ============================================================================

/// Unified academic journal quality ratings
#[derive(Parser)]
#[command(name = "journalscope")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Directory containing the seven source extracts
    #[arg(long, global = true, default_value = "./data")]
    data_dir: PathBuf,

    /// Ignore the cache and rebuild from the source extracts
    #[arg(long, global = true)]
    refresh: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the unified journal list from the source extracts
    Build {
        /// Also export the unified list as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Also export the unified list as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Filter, sort and page through the unified journal list
    Query {
        /// Apply a named preset (replaces all other filter flags)
        #[arg(long, value_parser = preset_names())]
        preset: Option<String>,

        /// Case-insensitive name substring
        #[arg(long)]
        search: Option<String>,

        /// ABDC ratings to include (repeatable)
        #[arg(long)]
        abdc: Vec<String>,

        /// ABS ratings to include (repeatable)
        #[arg(long)]
        abs: Vec<String>,

        /// Qualis tiers to include (repeatable)
        #[arg(long)]
        qualis: Vec<String>,

        /// SJR quartiles to include (repeatable)
        #[arg(long)]
        sjr_quartile: Vec<String>,

        /// JCR quartiles to include (repeatable)
        #[arg(long)]
        jcr_quartile: Vec<String>,

        /// Wiley subject areas to include (repeatable)
        #[arg(long)]
        wiley_subject: Vec<String>,

        /// Require the predatory flag to equal this
        #[arg(long)]
        predatory: Option<bool>,

        /// Require a Wiley APC value to be present (or absent)
        #[arg(long)]
        has_wiley_apc: Option<bool>,

        /// CiteScore lower bound (inclusive)
        #[arg(long)]
        min_cite_score: Option<f64>,

        /// CiteScore upper bound (inclusive)
        #[arg(long)]
        max_cite_score: Option<f64>,

        /// H-index lower bound (inclusive)
        #[arg(long)]
        min_h_index: Option<u32>,

        /// H-index upper bound (inclusive)
        #[arg(long)]
        max_h_index: Option<u32>,

        /// Sort field
        #[arg(long, default_value = "name", value_parser = sort_field_names())]
        sort: String,

        /// Sort descending instead of ascending
        #[arg(long)]
        desc: bool,

        /// 1-based page number
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(long, default_value = "50")]
        page_size: usize,

        /// Export the full matched set (not just the page) as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Find journals with names similar to a search term
    Similar {
        /// Journal name or fragment to match against
        name: String,

        /// Maximum number of matches
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Print coverage and distribution statistics
    Stats {
        /// Export the statistics as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Run as HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Manage the merge-output cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Clear the cached merge output
    Clear,
    /// Show cache file path
    Path,
}

fn preset_names() -> Vec<&'static str> {
    FilterPreset::ALL.iter().map(|p| p.name()).collect()
}

fn sort_field_names() -> Vec<&'static str> {
    vec![
        "name",
        "abdc",
        "abs",
        "qualis",
        "data-quality",
        "wiley-subject",
        "wiley-apc",
        "cite-score",
        "h-index",
        "impact-factor",
    ]
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    match cli.command {
        Commands::Build { csv, json } => run_build(&cli.data_dir, csv, json).await,
        Commands::Query {
            preset,
            search,
            abdc,
            abs,
            qualis,
            sjr_quartile,
            jcr_quartile,
            wiley_subject,
            predatory,
            has_wiley_apc,
            min_cite_score,
            max_cite_score,
            min_h_index,
            max_h_index,
            sort,
            desc,
            page,
            page_size,
            csv,
        } => {
            let spec = match preset.as_deref().and_then(FilterPreset::from_name) {
                Some(preset) => preset.spec(),
                None => FilterSpec {
                    search_term: search.unwrap_or_default(),
                    abdc,
                    abs,
                    qualis,
                    sjr_quartile,
                    jcr_quartile,
                    wiley_subjects: wiley_subject,
                    predatory,
                    has_wiley_apc,
                    min_cite_score,
                    max_cite_score,
                    min_h_index,
                    max_h_index,
                },
            };
            let field = SortField::from_name(&sort).context("Unknown sort field")?;
            let direction = if desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            };
            run_query(&cli.data_dir, cli.refresh, &spec, field, direction, page, page_size, csv).await
        }
        Commands::Similar { name, limit } => {
            run_similar(&cli.data_dir, cli.refresh, &name, limit).await
        }
        Commands::Stats { json } => run_stats(&cli.data_dir, cli.refresh, json).await,
        Commands::Serve { port, host } => run_server(&cli.data_dir, cli.refresh, host, port).await,
        Commands::Cache { action } => handle_cache(action),
    }
}

// ============================================================================
// Journal List Acquisition
// ============================================================================

/// Fetch the unified journal list: cache when fresh, rebuild otherwise.
async fn acquire_journals(data_dir: &std::path::Path, refresh: bool) -> Result<Vec<UnifiedJournal>> {
    let manager = CacheManager::new()?;

    if !refresh {
        if let Some(journals) = manager.load(Duration::hours(DEFAULT_MAX_AGE_HOURS)) {
            return Ok(journals);
        }
    }

    let paths = SourcePaths::in_dir(data_dir);
    let (journals, report) = loader::load_and_merge(&paths).await;

    for (source, reason) in &report.failed {
        eprintln!("Warning: {} unavailable ({})", source, reason);
    }
    if report.loaded.is_empty() {
        anyhow::bail!(
            "No source extracts could be loaded from {:?}",
            data_dir
        );
    }

    manager.save(&journals)?;
    Ok(journals)
}

// ============================================================================
// Build
// ============================================================================

async fn run_build(
    data_dir: &std::path::Path,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
) -> Result<()> {
    let journals = acquire_journals(data_dir, true).await?;
    println!("Unified {} journals.", journals.len());

    if let Some(path) = csv {
        export::write_csv(journals.iter(), &path)?;
        println!("CSV: {:?}", path);
    }
    if let Some(path) = json {
        export::write_json(journals.iter(), &path)?;
        println!("JSON: {:?}", path);
    }
    Ok(())
}

// ============================================================================
// Query
// ============================================================================

#[allow(clippy::too_many_arguments)]
async fn run_query(
    data_dir: &std::path::Path,
    refresh: bool,
    spec: &FilterSpec,
    field: SortField,
    direction: SortDirection,
    page: usize,
    page_size: usize,
    csv: Option<PathBuf>,
) -> Result<()> {
    let journals = acquire_journals(data_dir, refresh).await?;
    let outcome = apply_filters(&journals, spec);

    let mut matched = outcome.matched;
    sort_records(&mut matched, field, direction);

    if let Some(path) = csv {
        export::write_csv(matched.iter().copied(), &path)?;
        println!("CSV: {:?}", path);
    }

    let window = paginate(&matched, page, page_size);
    print_journal_table(&window.items);
    println!(
        "\nPage {}/{} - {} of {} journals ({} filters active)",
        window.page,
        window.total_pages.max(1),
        window.items.len(),
        outcome.stats.total_results,
        outcome.stats.active_filter_count,
    );
    Ok(())
}

fn print_journal_table(journals: &[&UnifiedJournal]) {
    println!(
        "{:<50} {:>4} {:>4} {:>6} {:>5} {:>5} {:>8} {:>8}",
        "Journal", "ABDC", "ABS", "Qualis", "SJR", "JCR", "CiteSc", "Quality"
    );
    for journal in journals {
        let name: String = journal.display_name.chars().take(50).collect();
        println!(
            "{:<50} {:>4} {:>4} {:>6} {:>5} {:>5} {:>8} {:>8}{}",
            name,
            journal.abdc.as_deref().unwrap_or("-"),
            journal.abs.as_deref().unwrap_or("-"),
            journal.qualis.as_str(),
            journal
                .sjr_quartile()
                .map(|q| q.as_str())
                .unwrap_or("-"),
            journal
                .jcr
                .as_ref()
                .map(|j| j.quartile.as_str())
                .filter(|q| !q.is_empty())
                .unwrap_or("-"),
            journal
                .cite_score
                .as_ref()
                .map(|c| format!("{:.1}", c.score))
                .unwrap_or_else(|| "-".to_string()),
            journal.data_quality.as_str(),
            if journal.is_predatory() { "  PREDATORY" } else { "" },
        );
    }
}

// ============================================================================
// Similar
// ============================================================================

async fn run_similar(
    data_dir: &std::path::Path,
    refresh: bool,
    name: &str,
    limit: usize,
) -> Result<()> {
    let journals = acquire_journals(data_dir, refresh).await?;
    let matches = similar::find_similar(&journals, name, limit);

    if matches.is_empty() {
        println!("No similar journals found for \"{}\".", name);
        return Ok(());
    }

    println!("Journals similar to \"{}\":", name);
    for m in &matches {
        println!(
            "  {:>4}  {} [{}]",
            m.score,
            m.journal.display_name,
            m.journal.qualis.as_str(),
        );
    }
    Ok(())
}

// ============================================================================
// Stats
// ============================================================================

async fn run_stats(
    data_dir: &std::path::Path,
    refresh: bool,
    json: Option<PathBuf>,
) -> Result<()> {
    let journals = acquire_journals(data_dir, refresh).await?;
    let stats = unified_stats(&journals);

    println!("Total journals: {}", stats.total);
    println!("\nSource coverage:");
    println!("  ABDC:      {}", stats.by_source.abdc);
    println!("  ABS:       {}", stats.by_source.abs);
    println!("  SJR:       {}", stats.by_source.sjr);
    println!("  JCR:       {}", stats.by_source.jcr);
    println!("  CiteScore: {}", stats.by_source.cite_score);
    println!("  Wiley:     {}", stats.by_source.wiley);
    println!("  Predatory: {}", stats.by_source.predatory);

    println!("\nABDC distribution:");
    for (rating, count) in &stats.distributions.abdc {
        println!("  {:<4} {}", rating, count);
    }
    println!("\nData quality:");
    for (tier, count) in &stats.distributions.data_quality {
        println!("  {:<7} {}", tier, count);
    }
    if stats.apc.count > 0 {
        println!(
            "\nWiley APC (USD): n={}, min={:.0}, median={:.0}, mean={:.0}, max={:.0}",
            stats.apc.count, stats.apc.min, stats.apc.median, stats.apc.mean, stats.apc.max,
        );
    }

    if let Some(path) = json {
        export::write_stats_json(&stats, &path)?;
        println!("\nJSON: {:?}", path);
    }
    Ok(())
}

// ============================================================================
// HTTP Server
// ============================================================================

async fn run_server(
    data_dir: &std::path::Path,
    refresh: bool,
    host: String,
    port: u16,
) -> Result<()> {
    let journals = acquire_journals(data_dir, refresh).await?;
    info!(host = %host, port = port, journals = journals.len(), "Starting HTTP server");
    println!("Serving {} journals at http://{}:{}", journals.len(), host, port);

    let app_state = Arc::new(AppState { journals });

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .route("/stats", get(stats_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid host:port")?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

struct AppState {
    journals: Vec<UnifiedJournal>,
}

/// Health check endpoint
async fn health_handler() -> &'static str {
    "OK"
}

/// Query request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest {
    /// Apply a named preset instead of `filter`
    preset: Option<String>,
    #[serde(default)]
    filter: FilterSpec,
    #[serde(default = "default_sort")]
    sort: String,
    #[serde(default)]
    desc: bool,
    #[serde(default = "default_page")]
    page: usize,
    #[serde(default = "default_page_size")]
    page_size: usize,
}

fn default_sort() -> String {
    "name".to_string()
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    50
}

/// Query response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    status: String,
    stats: FilterStats,
    page: Page<UnifiedJournal>,
}

/// Query endpoint handler
async fn query_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let spec = match req.preset.as_deref().and_then(FilterPreset::from_name) {
        Some(preset) => preset.spec(),
        None => req.filter,
    };
    info!(sort = %req.sort, page = req.page, active = spec.active_filter_count(), "Query request");

    let Some(field) = SortField::from_name(&req.sort) else {
        error!(sort = %req.sort, "Unknown sort field");
        return Json(QueryResponse {
            status: format!("error: unknown sort field \"{}\"", req.sort),
            stats: FilterStats::default(),
            page: paginate(&[], 1, req.page_size.max(1)),
        });
    };
    let direction = if req.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };

    let outcome = apply_filters(&state.journals, &spec);
    let mut matched = outcome.matched;
    sort_records(&mut matched, field, direction);

    let window = paginate(&matched, req.page, req.page_size.max(1));
    let page = Page {
        items: window.items.into_iter().cloned().collect(),
        total_items: window.total_items,
        total_pages: window.total_pages,
        page: window.page,
        page_size: window.page_size,
        has_next: window.has_next,
        has_prev: window.has_prev,
    };

    Json(QueryResponse {
        status: "success".to_string(),
        stats: outcome.stats,
        page,
    })
}

/// Statistics endpoint handler
async fn stats_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let stats = unified_stats(&state.journals);
    Json(serde_json::json!({ "status": "success", "stats": stats }))
}

// ============================================================================
// Cache Management
// ============================================================================

fn handle_cache(action: CacheAction) -> Result<()> {
    let manager = CacheManager::new()?;

    match action {
        CacheAction::Clear => {
            manager.clear()?;
            println!("Cache cleared.");
        }
        CacheAction::Path => {
            println!("Cache file: {:?}", manager.path());
        }
    }

    Ok(())
}
