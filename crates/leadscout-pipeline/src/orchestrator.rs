//! Run orchestration: discovery, then enrichment, then one sink push.

use uuid::Uuid;

use leadscout_core::RunConfig;
use leadscout_scraper::{FetchService, PageFetcher};

use crate::discovery::discover_candidates;
use crate::enrichment::{enrich_candidates, EnrichmentPolicy};
use crate::error::PipelineError;
use crate::sink::RecordSink;

/// Totals for one completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub candidates_discovered: usize,
    pub pages_loaded: usize,
    pub profiles_retained: usize,
    pub reached_cap: bool,
}

/// Run the full lead pipeline once.
///
/// 1. Validate `config`.
/// 2. Discover candidate profile URLs from one search page per query.
/// 3. Enrich, score and filter candidates until `max_profiles` are retained.
/// 4. Push the retained records to `sink` in a single batch.
///
/// Discovery and enrichment take separate fetch services so profile pages can
/// go through a rendering fetcher while search pages stay on plain HTTP.
///
/// # Errors
///
/// Returns [`PipelineError::Config`] for an invalid configuration (before any
/// fetch) and [`PipelineError::Sink`] if the batch cannot be written. Page
/// failures are never errors.
pub async fn run_pipeline<D, E, S>(
    config: &RunConfig,
    discovery: &FetchService<D>,
    enrichment: &FetchService<E>,
    sink: &S,
) -> Result<RunSummary, PipelineError>
where
    D: PageFetcher,
    E: PageFetcher,
    S: RecordSink,
{
    config.validate()?;

    let run_id = Uuid::new_v4();
    tracing::info!(
        %run_id,
        queries = config.queries.len(),
        max_profiles = config.max_profiles,
        min_followers = ?config.min_followers,
        active_within_days = ?config.active_within_days,
        use_browser = config.use_browser_for_profiles,
        "starting lead run"
    );

    let candidates =
        discover_candidates(discovery, &config.queries, config.candidate_limit()).await;
    let candidates_discovered = candidates.len();
    tracing::info!(%run_id, candidates = candidates_discovered, "discovery complete");

    let policy = EnrichmentPolicy::from(config);
    let outcome = enrich_candidates(enrichment, candidates, &policy).await;

    tracing::info!(
        %run_id,
        retained = outcome.results.len(),
        pages_loaded = outcome.pages_loaded,
        reached_cap = outcome.reached_cap,
        "saving results"
    );
    sink.push_batch(&outcome.results).await?;

    Ok(RunSummary {
        run_id,
        candidates_discovered,
        pages_loaded: outcome.pages_loaded,
        profiles_retained: outcome.results.len(),
        reached_cap: outcome.reached_cap,
    })
}
