//! One report run, start to finish.
//!
//! ```text
//! backup → SnapshotReconciler
//! log → LogParser → backup overwrite → mark new → StatusMap + violations
//!     → cache sweep → ParallelFetcher → ReportRenderer → output file
//! ```
//!
//! Only an unreadable primary log aborts a run. Every other failure is logged
//! and degrades to empty data, a cache miss or a placeholder poster.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use tracing::{info, warn};

use crate::app::{AppContext, Result};
use crate::cache::{PosterCache, SweepStats};
use crate::config::ReportConfig;
use crate::domain::Report;
use crate::fetcher::parallel::FetchStats;
use crate::parser::{backup_path, read_log, write_backup, LogParser};
use crate::reconcile::SnapshotReconciler;
use crate::render::ReportRenderer;
use crate::status::{load_violations, StatusMap};

/// What a completed run did.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub records: usize,
    pub new_records: usize,
    pub total_count: u64,
    pub inaccessible: usize,
    pub violations: usize,
    pub fetch: FetchStats,
    pub sweep: SweepStats,
    pub output_path: PathBuf,
}

/// Parse the log and merge auxiliary data, without touching the network.
///
/// With `persist_backup` the raw log replaces the previous snapshot once it
/// has been parsed, so the next run diffs against this one.
pub fn assemble(config: &ReportConfig, persist_backup: bool) -> Result<Report> {
    let backup = backup_path(&config.log_path, &config.backup_suffix);
    let reconciler = SnapshotReconciler::from_backup(&backup)
        .mark_all_new_on_first_run(config.mark_all_new_on_first_run);

    let content = read_log(&config.log_path)?;
    let parsed = LogParser::new().parse(&content);
    info!(
        path = %config.log_path.display(),
        records = parsed.records.len(),
        total = parsed.total_count,
        inaccessible = parsed.inaccessible_urls.len(),
        "parsed log"
    );

    if persist_backup {
        if let Err(e) = write_backup(&content, &backup) {
            warn!(path = %backup.display(), error = %e, "failed to write log backup");
        }
    }

    let mut records = parsed.records;
    let new_records = reconciler.mark_new(&mut records);
    if reconciler.has_snapshot() {
        info!(new_records, "compared against previous snapshot");
    }

    StatusMap::load(&config.status_log_path)
        .with_base_title_fallback(config.status_base_title_fallback)
        .apply(&mut records);
    let violation_titles = load_violations(&config.violation_log_path);

    Ok(Report {
        records,
        total_count: parsed.total_count,
        inaccessible_urls: parsed.inaccessible_urls,
        violation_titles,
    })
}

/// Full run stamped with the local wall clock.
pub async fn run(ctx: &AppContext) -> Result<RunSummary> {
    run_at(ctx, Local::now().naive_local()).await
}

pub async fn run_at(ctx: &AppContext, generated_at: NaiveDateTime) -> Result<RunSummary> {
    let report_config = &ctx.config.report;
    let mut report = assemble(report_config, true)?;

    let sweep = ctx.cache.sweep();
    if sweep.removed > 0 || sweep.orphans > 0 || sweep.failed > 0 {
        info!(
            removed = sweep.removed,
            orphans = sweep.orphans,
            failed = sweep.failed,
            "swept expired cache entries"
        );
    }

    let fetch = ctx.parallel_fetcher.fetch_all(&mut report.records).await;
    info!(
        fetched = fetch.fetched,
        cache_hits = fetch.cache_hits,
        verification = fetch.verification,
        failed = fetch.failed,
        "posters resolved"
    );

    let html = ReportRenderer::new(report_config.page_size).render(&report, generated_at)?;
    write_output(&report_config.output_path, &html)?;
    info!(path = %report_config.output_path.display(), "report written");

    Ok(RunSummary {
        records: report.records.len(),
        new_records: report.new_count(),
        total_count: report.total_count,
        inaccessible: report.inaccessible_count(),
        violations: report.violation_count(),
        fetch,
        sweep,
        output_path: report_config.output_path.clone(),
    })
}

fn write_output(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, html)?;
    Ok(())
}
