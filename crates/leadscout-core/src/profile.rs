//! Profile records as extracted from a page and as emitted after scoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped profile, as produced by the extractor.
///
/// Never mutated after extraction; scoring produces a [`ScoredProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub handle: String,
    pub profile_url: String,
    pub display_name: String,
    pub bio_text: String,
    pub follower_count: u64,
    pub is_private: bool,
    /// First email found on the page, if any.
    pub email: Option<String>,
    /// Unique URLs in order of first appearance.
    pub external_links: Vec<String>,
    /// Hostnames of `external_links` with any leading `www.` removed.
    pub monetization_domains: Vec<String>,
    pub last_post_date: Option<DateTime<Utc>>,
    pub last_post_days_ago: Option<u32>,
}

impl ProfileRecord {
    /// `true` when the profile exposes an email or at least one external link.
    #[must_use]
    pub fn has_link_or_email(&self) -> bool {
        self.email.is_some() || !self.external_links.is_empty()
    }
}

/// Score and evidence trail computed for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Lead score in `[0, 100]`.
    pub score: u8,
    pub reason: String,
    pub offer_keywords_matched: Vec<String>,
    pub niche_keywords_matched: Vec<String>,
}

/// A profile merged with its score card. This is the shape handed to sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredProfile {
    #[serde(flatten)]
    pub profile: ProfileRecord,
    #[serde(flatten)]
    pub card: ScoreCard,
}

impl ScoredProfile {
    #[must_use]
    pub fn new(profile: ProfileRecord, card: ScoreCard) -> Self {
        Self { profile, card }
    }

    #[must_use]
    pub fn score(&self) -> u8 {
        self.card.score
    }
}
