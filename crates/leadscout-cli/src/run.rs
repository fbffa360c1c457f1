//! The lead-finding run: concrete fetchers and sink wired into the pipeline.

use std::path::Path;

use leadscout_core::{AppConfig, RunConfig};
use leadscout_pipeline::{run_pipeline, JsonFileSink, RunSummary};
use leadscout_scraper::{search_results_url, BrowserlessFetcher, FetchService, HttpFetcher};

/// Build the fetchers and sink from configuration and run the pipeline once.
///
/// Search pages always go over plain HTTP. Profile pages go through the
/// headless browser when `use_browser_for_profiles` is set, which requires
/// `BROWSERLESS_URL`.
///
/// # Errors
///
/// Returns an error if a fetcher cannot be built (bad proxy URL, missing or
/// bad browser endpoint) or the output file cannot be written.
pub(crate) async fn run_leads(
    app: &AppConfig,
    run: &RunConfig,
    output: &Path,
) -> anyhow::Result<()> {
    let discovery = FetchService::new(
        HttpFetcher::from_app_config(app)
            .map_err(|e| anyhow::anyhow!("failed to build HTTP fetcher: {e}"))?,
        app.fetch_concurrency,
    );
    let sink = JsonFileSink::new(output);

    tracing::info!(
        queries = run.queries.len(),
        max_profiles = run.max_profiles,
        use_browser = run.use_browser_for_profiles,
        output = %output.display(),
        "starting lead run"
    );

    let summary = if run.use_browser_for_profiles {
        let enrichment = FetchService::new(
            BrowserlessFetcher::from_app_config(app)
                .map_err(|e| anyhow::anyhow!("failed to build browser fetcher: {e}"))?,
            app.fetch_concurrency,
        );
        run_pipeline(run, &discovery, &enrichment, &sink)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "lead run failed"))?
    } else {
        let enrichment = FetchService::new(
            HttpFetcher::from_app_config(app)
                .map_err(|e| anyhow::anyhow!("failed to build HTTP fetcher: {e}"))?,
            app.fetch_concurrency,
        );
        run_pipeline(run, &discovery, &enrichment, &sink)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "lead run failed"))?
    };

    tracing::info!(
        run_id = %summary.run_id,
        retained = summary.profiles_retained,
        reached_cap = summary.reached_cap,
        "lead run finished"
    );

    println!("{}", summary_line(&summary, output));
    Ok(())
}

/// Print what a run would do without issuing any request.
pub(crate) fn print_dry_run(run: &RunConfig, output: &Path) {
    println!(
        "dry-run: {} queries, max {} profiles, up to {} candidates, profiles via {}",
        run.queries.len(),
        run.max_profiles,
        run.candidate_limit(),
        if run.use_browser_for_profiles {
            "browser"
        } else {
            "http"
        }
    );
    for query in &run.queries {
        println!("  {}", search_results_url(query));
    }
    println!("  output: {}", output.display());
}

fn summary_line(summary: &RunSummary, output: &Path) -> String {
    let stop = if summary.reached_cap {
        " (stopped at max profiles)"
    } else {
        ""
    };
    format!(
        "run {}: {} candidates, {} pages loaded, {} leads written to {}{}",
        summary.run_id,
        summary.candidates_discovered,
        summary.pages_loaded,
        summary.profiles_retained,
        output.display(),
        stop
    )
}
