//! Profile extraction from fetched Instagram profile pages.
//!
//! Two entry points share one parser: [`extract_profile`] for static HTML and
//! [`extract_from_rendered_page`] for browser-rendered DOM snapshots, which
//! additionally carry last-activity and privacy signals.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Url;

use leadscout_core::ProfileRecord;

use crate::extract_helpers::{
    clean_text, decode_entities, find_embedded_biography, find_meta_content,
};
use crate::fetch::RenderedPage;

static FOLLOWERS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d[\d,]*(?:\.\d+)?)\s*([kmb])?\s+followers\b")
        .expect("valid followers regex")
});
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:https?://|\bwww\.)[^\s"'<>()\[\]{}\\|^`]+"#).expect("valid url regex")
});

const TARGET_DOMAIN_MARKER: &str = "instagram.com/";

/// Suffixes that make an `a@b.c` match an asset filename rather than an address.
const ASSET_SUFFIXES: [&str; 7] = [".png", ".jpg", ".jpeg", ".gif", ".webp", ".svg", ".js"];

/// Extract a profile record from static page HTML.
///
/// Returns `None` for empty content or when `source_url` carries no handle.
/// Never reports a profile as private: the static page does not expose it.
#[must_use]
pub fn extract_profile(page_content: &str, source_url: &str) -> Option<ProfileRecord> {
    if page_content.trim().is_empty() {
        return None;
    }
    let handle = handle_from_url(source_url)?;

    let title = find_meta_content(page_content, "property", "og:title").unwrap_or_default();
    let description = find_meta_content(page_content, "property", "og:description")
        .or_else(|| find_meta_content(page_content, "name", "description"))
        .map(|d| clean_text(&d))
        .unwrap_or_default();

    let display_name = display_name_from_title(&title);
    let bio_text = find_embedded_biography(page_content).unwrap_or_else(|| description.clone());
    let follower_count = parse_follower_count(&description);

    let email = find_emails(page_content, &description).into_iter().next();
    let external_links = find_links(page_content);
    let monetization_domains = domains_of(&external_links);

    Some(ProfileRecord {
        handle,
        profile_url: source_url.to_string(),
        display_name,
        bio_text,
        follower_count,
        is_private: false,
        email,
        external_links,
        monetization_domains,
        last_post_date: None,
        last_post_days_ago: None,
    })
}

/// Extract a profile record from a browser-rendered page.
///
/// Adds what only the live DOM exposes: the private-account banner and the
/// first `<time datetime>` element, read as the most recent post date.
/// `last_post_days_ago` is whole days elapsed at `now`, floored, never negative.
/// A page showing the login form yields `None`.
#[must_use]
pub fn extract_from_rendered_page(
    page: &RenderedPage,
    source_url: &str,
    now: DateTime<Utc>,
) -> Option<ProfileRecord> {
    if page.shows_login_wall() {
        return None;
    }
    let mut profile = extract_profile(page.content(), source_url)?;

    profile.is_private = page.shows_private_banner();

    if let Some(posted_at) = page.time_datetime().as_deref().and_then(parse_timestamp) {
        profile.last_post_date = Some(posted_at);
        profile.last_post_days_ago = Some(days_between(posted_at, now));
    }

    Some(profile)
}

/// Parse `"<number><K|M|B> Followers"` out of a description string.
///
/// Thousands separators are ignored; suffixes multiply by 1e3/1e6/1e9 and the
/// result is rounded to the nearest integer. Returns `0` when the phrase is absent.
#[must_use]
pub fn parse_follower_count(description: &str) -> u64 {
    let Some(caps) = FOLLOWERS_RE.captures(description) else {
        return 0;
    };
    let number = caps.get(1).map_or("", |m| m.as_str()).replace(',', "");
    let Ok(base) = number.parse::<f64>() else {
        return 0;
    };
    let multiplier = match caps
        .get(2)
        .map(|m| m.as_str().to_ascii_lowercase())
        .as_deref()
    {
        Some("k") => 1e3,
        Some("m") => 1e6,
        Some("b") => 1e9,
        _ => 1.0,
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = (base * multiplier).round().max(0.0) as u64;
    count
}

/// The path segment following `instagram.com/` in the page URL.
fn handle_from_url(source_url: &str) -> Option<String> {
    let lower = source_url.to_ascii_lowercase();
    let start = lower.find(TARGET_DOMAIN_MARKER)? + TARGET_DOMAIN_MARKER.len();
    let handle: String = source_url[start..]
        .chars()
        .take_while(|c| !matches!(c, '/' | '?' | '#'))
        .collect();
    (!handle.is_empty()).then_some(handle)
}

/// `"Jane Doe (@jane) • Instagram photos and videos"` → `"Jane Doe"`.
fn display_name_from_title(title: &str) -> String {
    let name = title.split(" (@").next().unwrap_or_default();
    clean_text(name)
}

/// Emails from the page body, then the description; unique, scan order kept.
fn find_emails(page_content: &str, description: &str) -> Vec<String> {
    let decoded = decode_entities(page_content);
    let mut seen = HashSet::new();
    [decoded.as_str(), description]
        .into_iter()
        .flat_map(|text| EMAIL_RE.find_iter(text))
        .map(|m| m.as_str().trim_end_matches('.').to_string())
        .filter(|email| {
            let lower = email.to_ascii_lowercase();
            !ASSET_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
        })
        .filter(|email| seen.insert(email.clone()))
        .collect()
}

/// Absolute and bare `www.` URLs in the page, normalized to `https://` for the
/// bare form, unique in order of first appearance.
fn find_links(page_content: &str) -> Vec<String> {
    let decoded = decode_entities(page_content);
    let mut seen = HashSet::new();
    URL_RE
        .find_iter(&decoded)
        .map(|m| {
            let raw = m
                .as_str()
                .trim_end_matches(['.', ',', ';', ':', '!', '?', '&']);
            if raw.to_ascii_lowercase().starts_with("www.") {
                format!("https://{raw}")
            } else {
                raw.to_string()
            }
        })
        .filter(|link| link.len() > "https://".len())
        .filter(|link| seen.insert(link.clone()))
        .collect()
}

/// Hostnames of `links` with a leading `www.` removed; unparseable links are skipped.
fn domains_of(links: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .filter_map(|link| Url::parse(link).ok())
        .filter_map(|url| url.host_str().map(str::to_ascii_lowercase))
        .map(|host| host.trim_start_matches("www.").to_string())
        .filter(|host| !host.is_empty())
        .filter(|host| seen.insert(host.clone()))
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn days_between(then: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = (now - then).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
