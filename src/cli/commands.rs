use crate::app::{AppContext, Result};
use crate::cache::{DiskCache, PosterCache};
use crate::config::Config;
use crate::domain::{MovieRecord, StorageProvider};
use crate::pipeline;

pub async fn report(ctx: &AppContext) -> Result<()> {
    let summary = pipeline::run(ctx).await?;

    println!(
        "Wrote {} ({} records, {} new, {} posters fetched, {} from cache, {} unavailable)",
        summary.output_path.display(),
        summary.records,
        summary.new_records,
        summary.fetch.fetched,
        summary.fetch.cache_hits,
        summary.fetch.failed + summary.fetch.verification + summary.fetch.skipped,
    );
    if summary.fetch.verification > 0 {
        eprintln!(
            "  {} posters hit the verification page; solve it in a browser and rerun",
            summary.fetch.verification
        );
    }

    Ok(())
}

pub fn list(config: &Config) -> Result<()> {
    let report = pipeline::assemble(&config.report, false)?;

    if report.records.is_empty() {
        println!("No records");
        return Ok(());
    }

    for record in &report.records {
        println!("{}", list_line(record));
    }

    println!(
        "\n{} records ({} new), total {}, {} inaccessible, {} violations",
        report.records.len(),
        report.new_count(),
        report.total_count,
        report.inaccessible_count(),
        report.violation_count()
    );

    Ok(())
}

pub fn sweep(config: &Config) -> Result<()> {
    let cache = DiskCache::new(&config.cache.dir, config.cache.ttl())?;
    let stats = cache.sweep();

    println!(
        "Swept {}: {} scanned, {} removed, {} orphaned temp files, {} errors",
        cache.dir().display(),
        stats.scanned,
        stats.removed,
        stats.orphans,
        stats.failed
    );

    Ok(())
}

fn list_line(record: &MovieRecord) -> String {
    let new_marker = if record.is_new { "●" } else { " " };

    let providers: Vec<&str> = StorageProvider::ALL
        .into_iter()
        .filter(|p| record.link(*p).is_some())
        .map(StorageProvider::display_name)
        .collect();
    let providers = if providers.is_empty() {
        "-".to_string()
    } else {
        providers.join("/")
    };

    format!(
        "{} [{}] {} ({})",
        new_marker,
        record.status.label(),
        record.title,
        providers
    )
}
