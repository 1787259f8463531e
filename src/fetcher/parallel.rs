use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::cache::PosterCache;
use crate::domain::{MovieRecord, Placeholder};
use crate::scraper::{PosterOutcome, PosterResolution, PosterScraper};

/// Per-run poster resolution counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub cache_hits: usize,
    pub fetched: usize,
    pub verification: usize,
    pub failed: usize,
    /// Records without a Douban link
    pub skipped: usize,
}

/// One network lookup, shared by every record with the same cache key.
struct Job {
    cache_key: String,
    douban_url: String,
    douban_id: String,
    title: String,
    indices: Vec<usize>,
}

pub struct ParallelFetcher {
    scraper: Arc<PosterScraper>,
    cache: Arc<dyn PosterCache>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn with_workers(
        scraper: Arc<PosterScraper>,
        cache: Arc<dyn PosterCache>,
        workers: usize,
    ) -> Self {
        Self {
            scraper,
            cache,
            semaphore: Arc::new(Semaphore::new(workers.clamp(1, Semaphore::MAX_PERMITS))),
        }
    }

    /// Fill `poster_url` on every record, from cache where fresh, otherwise from the network.
    pub async fn fetch_all(&self, records: &mut [MovieRecord]) -> FetchStats {
        let mut stats = FetchStats::default();
        let jobs = self.plan(records, &mut stats);

        if jobs.is_empty() {
            return stats;
        }
        info!(jobs = jobs.len(), cache_hits = stats.cache_hits, "fetching posters");

        let mut handles = Vec::with_capacity(jobs.len());
        let mut targets = Vec::with_capacity(jobs.len());

        for job in jobs {
            let scraper = self.scraper.clone();
            let cache = self.cache.clone();
            let semaphore = self.semaphore.clone();
            let douban_url = job.douban_url.clone();
            let cache_key = job.cache_key.clone();
            let douban_id = job.douban_id.clone();
            let title = job.title.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return PosterResolution::unavailable(0);
                };

                let resolution = scraper.resolve(&douban_url).await;

                if let PosterOutcome::Found(url) = &resolution.outcome {
                    match cache.put(&cache_key, url, &douban_id, &title) {
                        Ok(()) => info!(title = %title, "cached poster"),
                        Err(e) => warn!(title = %title, error = %e, "failed to write cache entry"),
                    }
                }

                resolution
            }));
            targets.push(job);
        }

        for (job, joined) in targets.into_iter().zip(join_all(handles).await) {
            let resolution = match joined {
                Ok(resolution) => resolution,
                Err(e) => {
                    error!(title = %job.title, "Task join error: {}", e);
                    PosterResolution::unavailable(0)
                }
            };

            match resolution.outcome {
                PosterOutcome::Found(_) => stats.fetched += job.indices.len(),
                PosterOutcome::VerificationRequired => stats.verification += job.indices.len(),
                PosterOutcome::Unavailable => stats.failed += job.indices.len(),
            }
            for index in job.indices {
                records[index].poster_url = resolution.poster_url().to_string();
            }
        }

        stats
    }

    /// Apply cache hits and group the remaining records into one job per cache key.
    fn plan(&self, records: &mut [MovieRecord], stats: &mut FetchStats) -> Vec<Job> {
        let mut jobs: Vec<Job> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for (index, record) in records.iter_mut().enumerate() {
            if !record.has_douban() {
                record.poster_url = Placeholder::NoImage.data_uri().to_string();
                stats.skipped += 1;
                continue;
            }

            if let Some(entry) = self.cache.get(&record.cache_key, &record.douban_id) {
                debug!(title = %record.title, "poster loaded from cache");
                record.poster_url = entry.poster_url;
                stats.cache_hits += 1;
                continue;
            }

            match by_key.get(&record.cache_key) {
                Some(&job) => jobs[job].indices.push(index),
                None => {
                    by_key.insert(record.cache_key.clone(), jobs.len());
                    jobs.push(Job {
                        cache_key: record.cache_key.clone(),
                        douban_url: record.douban_url.clone(),
                        douban_id: record.douban_id.clone(),
                        title: record.title.clone(),
                        indices: vec![index],
                    });
                }
            }
        }

        jobs
    }
}
