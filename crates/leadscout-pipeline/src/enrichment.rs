//! Enrichment phase: candidate profile pages to retained, scored records.

use std::pin::pin;

use chrono::{DateTime, Utc};
use futures::StreamExt;

use leadscout_core::{ProfileRecord, RunConfig, ScoredProfile};
use leadscout_scoring::{score_profile, should_keep, RetentionPolicy, ScorePolicy};
use leadscout_scraper::{
    canonicalize_profile_url, extract_from_rendered_page, extract_profile, FetchService,
    FetchedPage, PageContent, PageFetcher,
};

/// Cap and thresholds the enrichment loop applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentPolicy {
    pub max_profiles: usize,
    pub score: ScorePolicy,
    pub retention: RetentionPolicy,
}

impl From<&RunConfig> for EnrichmentPolicy {
    fn from(config: &RunConfig) -> Self {
        Self {
            max_profiles: config.max_profiles,
            score: ScorePolicy::from(config),
            retention: RetentionPolicy::from(config),
        }
    }
}

/// What the enrichment loop produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentOutcome {
    /// Retained records, in completion order.
    pub results: Vec<ScoredProfile>,
    /// Pages that loaded, whether or not they yielded a record.
    pub pages_loaded: usize,
    /// `true` when the loop stopped because `max_profiles` records were retained.
    pub reached_cap: bool,
}

/// Fetch every candidate, extract, score and filter, until `max_profiles`
/// records are retained.
///
/// At the cap the fetch stream is dropped: no further requests start and
/// in-flight ones are abandoned.
pub async fn enrich_candidates<F: PageFetcher>(
    service: &FetchService<F>,
    candidates: Vec<String>,
    policy: &EnrichmentPolicy,
) -> EnrichmentOutcome {
    let budget = candidates.len();
    let mut outcome = EnrichmentOutcome::default();
    let mut pages = pin!(service.run(candidates, budget));

    while let Some(page) = pages.next().await {
        outcome.pages_loaded += 1;

        let Some(profile) = profile_from_page(&page, Utc::now()) else {
            continue;
        };

        let card = score_profile(&profile, &policy.score);
        let scored = ScoredProfile::new(profile, card);

        if !should_keep(&scored, &policy.retention) {
            tracing::debug!(
                handle = %scored.profile.handle,
                followers = scored.profile.follower_count,
                score = scored.score(),
                "profile filtered out"
            );
            continue;
        }

        tracing::info!(
            handle = %scored.profile.handle,
            score = scored.score(),
            retained = outcome.results.len() + 1,
            "profile retained"
        );
        outcome.results.push(scored);

        if outcome.results.len() >= policy.max_profiles {
            tracing::info!(
                max_profiles = policy.max_profiles,
                "reached max profiles; stopping enrichment"
            );
            outcome.reached_cap = true;
            break;
        }
    }

    outcome
}

/// Extract a profile from one loaded page, dispatching on page kind.
///
/// A page whose final URL no longer resolves to the requested profile (a
/// login wall or other redirect) yields nothing.
fn profile_from_page(page: &FetchedPage, now: DateTime<Utc>) -> Option<ProfileRecord> {
    let Some(requested) = canonicalize_profile_url(&page.requested_url) else {
        tracing::debug!(url = %page.requested_url, "candidate is not a profile url");
        return None;
    };
    if canonicalize_profile_url(&page.loaded_url).as_deref() != Some(requested.as_str()) {
        tracing::debug!(
            requested = %page.requested_url,
            loaded = %page.loaded_url,
            "profile page redirected away, dropping"
        );
        return None;
    }

    let profile = match &page.content {
        PageContent::Static(html) => extract_profile(html, &requested),
        PageContent::Rendered(rendered) => extract_from_rendered_page(rendered, &requested, now),
    };
    if profile.is_none() {
        tracing::debug!(url = %requested, "no profile extracted");
    }
    profile
}
