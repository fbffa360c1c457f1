//! Regex-level HTML primitives shared by the profile extractor and the
//! search-page link scanner.
//!
//! Nothing here builds a DOM: profile pages are large, mostly script, and the
//! handful of fields we need sit in `<meta>` tags, `<time>` elements and
//! embedded JSON strings.

use std::sync::LazyLock;

use regex::Regex;

static META_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<meta\b[^>]*>").expect("valid regex"));
static TIME_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<time\b[^>]*>").expect("valid regex"));
static TAGS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));
static BIOGRAPHY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""biography"\s*:\s*("(?:[^"\\]|\\.)*")"#).expect("valid biography regex")
});

/// Content of the first `<meta>` tag whose `key_attr` equals `key_value`
/// (case-insensitive), entity-decoded. Attribute order does not matter.
pub(crate) fn find_meta_content(html: &str, key_attr: &str, key_value: &str) -> Option<String> {
    META_TAG_RE.find_iter(html).find_map(|m| {
        let tag = m.as_str();
        let key = extract_attr(tag, key_attr)?;
        if key.eq_ignore_ascii_case(key_value) {
            extract_attr(tag, "content").map(|raw| decode_entities(&raw))
        } else {
            None
        }
    })
}

/// `datetime` attribute of the first `<time>` element that carries one.
pub(crate) fn find_time_datetime(html: &str) -> Option<String> {
    TIME_TAG_RE
        .find_iter(html)
        .find_map(|m| extract_attr(m.as_str(), "datetime"))
}

/// The embedded `"biography": "..."` JSON string, unescaped.
pub(crate) fn find_embedded_biography(html: &str) -> Option<String> {
    let raw = BIOGRAPHY_RE.captures(html)?.get(1)?.as_str();
    let decoded: String = serde_json::from_str(raw).ok()?;
    let cleaned = clean_text(&decoded);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Value of `attr` inside a single tag; quotes may be single or double.
pub(crate) fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let pattern = format!(
        r#"(?is)(?:^|[\s<]){}\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
        regex::escape(attr)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(tag)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim().to_string())
}

/// Decode the handful of HTML entities that show up in attribute values.
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    input
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&#064;", "@")
        .replace("&#64;", "@")
        .replace("&amp;", "&")
}

/// Strip tags and collapse whitespace.
pub(crate) fn clean_text(input: &str) -> String {
    let no_tags = TAGS_RE.replace_all(input, " ");
    no_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meta_lookup_ignores_attribute_order() {
        let html = r#"
            <meta content="Jane (@jane) • Instagram" property="og:title">
            <meta property="og:description" content="1,204 Followers">
        "#;
        assert_eq!(
            find_meta_content(html, "property", "og:title").as_deref(),
            Some("Jane (@jane) • Instagram")
        );
        assert_eq!(
            find_meta_content(html, "property", "og:description").as_deref(),
            Some("1,204 Followers")
        );
    }

    #[test]
    fn meta_content_keeps_apostrophes_inside_double_quotes() {
        let html = r#"<meta name="description" content="Jane's page &amp; more">"#;
        assert_eq!(
            find_meta_content(html, "name", "description").as_deref(),
            Some("Jane's page & more")
        );
    }

    #[test]
    fn attr_lookup_does_not_match_suffixes() {
        let tag = r#"<meta data-content="wrong" content="right">"#;
        assert_eq!(extract_attr(tag, "content").as_deref(), Some("right"));
    }

    #[test]
    fn time_datetime_is_found() {
        let html = r#"<div><time class="x" datetime="2024-05-01T12:00:00.000Z" title="May 1">May 1</time></div>"#;
        assert_eq!(
            find_time_datetime(html).as_deref(),
            Some("2024-05-01T12:00:00.000Z")
        );
        assert_eq!(find_time_datetime("<time>May 1</time>"), None);
    }

    #[test]
    fn embedded_biography_is_unescaped() {
        let html = r#"{"user":{"biography":"Wholesale coach 🏠\nBook a call ↓","full_name":"J"}}"#;
        let bio = find_embedded_biography(html).unwrap();
        assert!(bio.starts_with("Wholesale coach"));
        assert!(bio.contains("Book a call"));
        assert!(!bio.contains('\n'));
    }

    #[test]
    fn clean_text_strips_tags_and_normalizes_space() {
        assert_eq!(clean_text("<b>Hello</b>\n\nworld"), "Hello world");
    }
}
