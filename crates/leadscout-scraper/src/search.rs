//! Search-engine result pages: query URLs and hyperlink extraction.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use regex::Regex;

use crate::extract_helpers::decode_entities;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid href regex")
});

const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// Build the search-results URL for one discovery query.
#[must_use]
pub fn search_results_url(query: &str) -> String {
    let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC).to_string();
    format!("{SEARCH_ENDPOINT}?q={encoded}")
}

/// Every `href` attribute value in the page, entity-decoded, in document order.
///
/// Fragment-only, `mailto:` and `javascript:` links are skipped.
#[must_use]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    HREF_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|m| decode_entities(m.as_str().trim()))
        .filter(|href| {
            !href.is_empty()
                && !href.starts_with('#')
                && !href.starts_with("mailto:")
                && !href.starts_with("javascript:")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_url_percent_encodes_query() {
        let url = search_results_url(r#"site:instagram.com ("coach" OR "apply")"#);
        assert!(url.starts_with("https://www.google.com/search?q=site%3Ainstagram%2Ecom"));
        assert!(!url.contains(' '));
        assert!(!url.contains('"'));
    }

    #[test]
    fn extracts_single_and_double_quoted_hrefs() {
        let html = r#"
            <a href="/url?q=https://instagram.com/jane/&amp;sa=X">Jane</a>
            <a class='r' href='https://www.instagram.com/bob/'>Bob</a>
        "#;
        let hrefs = extract_hrefs(html);
        assert_eq!(
            hrefs,
            vec![
                "/url?q=https://instagram.com/jane/&sa=X".to_string(),
                "https://www.instagram.com/bob/".to_string(),
            ]
        );
    }

    #[test]
    fn skips_non_navigational_hrefs() {
        let html = r##"
            <a href="#top">top</a>
            <a href="mailto:someone@example.com">mail</a>
            <a href="javascript:void(0)">js</a>
            <a href="">empty</a>
        "##;
        assert!(extract_hrefs(html).is_empty());
    }
}
