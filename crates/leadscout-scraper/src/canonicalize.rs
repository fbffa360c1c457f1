//! Instagram profile URL canonicalization.
//!
//! Maps any hyperlink found on a search-results page (including Google's
//! `/url?q=` redirect wrappers) to `https://www.instagram.com/<handle>/`, or
//! `None` when the link does not point at a profile.

use reqwest::Url;

/// Substring every candidate href must contain before it is parsed.
const TARGET_DOMAIN_MARKER: &str = "instagram.com/";
/// Hosts that serve profile pages. Other subdomains (help, about, business)
/// serve site content whose paths are not handles.
const PROFILE_HOSTS: [&str; 3] = ["instagram.com", "www.instagram.com", "m.instagram.com"];
const CANONICAL_ORIGIN: &str = "https://www.instagram.com";

const REDIRECT_ORIGIN: &str = "https://www.google.com";
const REDIRECT_PATH: &str = "/url";

/// Path segments that identify content pages rather than profiles, at any depth.
const CONTENT_SEGMENTS: [&str; 6] = ["p", "reel", "reels", "tv", "explore", "tags"];

/// First segments that are site sections, never handles.
const RESERVED_FIRST_SEGMENTS: [&str; 8] = [
    "accounts",
    "stories",
    "direct",
    "about",
    "legal",
    "developer",
    "web",
    "challenge",
];

/// Canonicalize a raw href into an Instagram profile URL.
///
/// Only the first path segment is kept as the handle, so links nested under
/// a profile (e.g. `/jane/tagged/`) collapse to that profile. Content links
/// (`/p/`, `/reel/`, `/tv/`, `/explore/`, `/tags/`) are rejected wherever the
/// segment appears. Handles are lower-cased.
///
/// Returns `None` for anything that is not a profile link; malformed input is
/// never an error.
#[must_use]
pub fn canonicalize_profile_url(raw_href: &str) -> Option<String> {
    let href = raw_href.trim();
    if href.is_empty() {
        return None;
    }

    let unwrapped;
    let href = if is_redirect_wrapper(href) {
        unwrapped = unwrap_redirect(href)?;
        unwrapped.as_str()
    } else {
        href
    };

    if !href.to_ascii_lowercase().contains(TARGET_DOMAIN_MARKER) {
        return None;
    }

    let url = Url::parse(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let host = url.host_str()?.to_ascii_lowercase();
    if !PROFILE_HOSTS.contains(&host.as_str()) {
        return None;
    }

    let segments: Vec<String> = url
        .path()
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    if segments
        .iter()
        .any(|segment| CONTENT_SEGMENTS.contains(&segment.as_str()))
    {
        return None;
    }

    let handle = segments.first()?;
    if RESERVED_FIRST_SEGMENTS.contains(&handle.as_str()) || !is_plausible_handle(handle) {
        return None;
    }

    Some(format!("{CANONICAL_ORIGIN}/{handle}/"))
}

/// `true` for Google's `/url?…` indirection, relative or absolute.
fn is_redirect_wrapper(href: &str) -> bool {
    if href.starts_with("/url?") {
        return true;
    }
    Url::parse(href).ok().is_some_and(|url| {
        url.path() == REDIRECT_PATH
            && url.query().is_some()
            && url
                .host_str()
                .is_some_and(|host| host.trim_start_matches("www.").starts_with("google."))
    })
}

/// Resolve a redirect wrapper against the search engine origin and return its `q` target.
fn unwrap_redirect(href: &str) -> Option<String> {
    let base = Url::parse(REDIRECT_ORIGIN).ok()?;
    let url = base.join(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.into_owned())
        .filter(|target| !target.is_empty())
}

/// Instagram handles are ASCII letters, digits, `.` and `_`.
fn is_plausible_handle(handle: &str) -> bool {
    !handle.is_empty()
        && handle
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}
