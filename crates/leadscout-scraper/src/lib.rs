pub mod canonicalize;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod search;

mod extract_helpers;
mod retry;

pub use canonicalize::canonicalize_profile_url;
pub use error::ScraperError;
pub use extract::{extract_from_rendered_page, extract_profile, parse_follower_count};
pub use fetch::{
    BrowserlessFetcher, FetchService, FetchedPage, HttpFetcher, PageContent, PageFetcher,
    RenderedPage,
};
pub use search::{extract_hrefs, search_results_url};
