//! Discovery phase: search-result pages to a deduplicated candidate list.

use std::collections::HashSet;
use std::pin::pin;

use futures::StreamExt;

use leadscout_scraper::{
    canonicalize_profile_url, extract_hrefs, search_results_url, FetchService, PageFetcher,
};

/// Insertion-ordered set of canonical profile URLs.
#[derive(Debug, Default)]
struct CandidateSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl CandidateSet {
    fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.ordered.push(url);
        true
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }

    fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Fetch one search-results page per query and collect every profile link
/// on them, in first-seen order, truncated to `limit`.
///
/// The request budget equals the number of queries. Pages that fail to load
/// contribute nothing.
pub async fn discover_candidates<F: PageFetcher>(
    service: &FetchService<F>,
    queries: &[String],
    limit: usize,
) -> Vec<String> {
    let search_urls: Vec<String> = queries.iter().map(|q| search_results_url(q)).collect();
    let budget = search_urls.len();

    let mut candidates = CandidateSet::default();
    let mut pages = pin!(service.run(search_urls, budget));

    while let Some(page) = pages.next().await {
        let mut added = 0usize;
        for href in extract_hrefs(page.content.as_str()) {
            if let Some(url) = canonicalize_profile_url(&href) {
                if candidates.insert(url) {
                    added += 1;
                }
            }
        }
        tracing::info!(
            url = %page.loaded_url,
            added,
            total_discovered = candidates.len(),
            "discovery page processed"
        );
    }

    let mut discovered = candidates.into_vec();
    if discovered.len() > limit {
        tracing::debug!(
            discovered = discovered.len(),
            limit,
            "truncating candidates to over-collection limit"
        );
        discovered.truncate(limit);
    }
    discovered
}
