//! Heuristic lead scorer for monetized creator profiles.

use leadscout_core::{ProfileRecord, RunConfig, ScoreCard};

/// Call-to-action and monetization-platform terms.
///
/// Matched as lowercase substrings, so platform names also hit on the
/// domains a profile links to.
pub const OFFER_KEYWORDS: &[&str] = &[
    "book a call",
    "apply",
    "coaching",
    "mentorship",
    "masterclass",
    "course",
    "free training",
    "community",
    "calendly",
    "stan.store",
    "skool",
    "kajabi",
    "whop",
    "linktr.ee",
    "beacons",
    "gumroad",
    "patreon",
    "discord",
];

/// Terms for the niches the default queries target.
pub const NICHE_KEYWORDS: &[&str] = &[
    "wholesaling",
    "wholesale",
    "real estate",
    "flipping",
    "trading",
    "options",
    "forex",
    "crypto",
    "stocks",
    "signals",
];

const KEYWORD_POINTS: i32 = 10;
const OFFER_CAP: i32 = 35;
const NICHE_CAP: i32 = 20;
const EMAIL_POINTS: i32 = 10;
const LINK_POINTS: i32 = 15;
const ACTIVE_POINTS: i32 = 15;
const STALE_PENALTY: i32 = -10;
const NO_CONTACT_PENALTY: i32 = -25;

/// The subset of run policy the scorer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScorePolicy {
    pub require_link_or_email: bool,
    /// `None` means any known post date counts as active.
    pub active_within_days: Option<u32>,
}

impl From<&RunConfig> for ScorePolicy {
    fn from(config: &RunConfig) -> Self {
        Self {
            require_link_or_email: config.require_link_or_email,
            active_within_days: config.active_within_days,
        }
    }
}

/// Score `profile` in `[0, 100]` and record the evidence behind the number.
///
/// Keywords are matched case-insensitively against the bio and, separately,
/// the space-joined monetization domains; a term never spans the two.
/// Matched lists follow vocabulary order.
#[must_use]
pub fn score_profile(profile: &ProfileRecord, policy: &ScorePolicy) -> ScoreCard {
    let bio = profile.bio_text.to_lowercase();
    let domains = profile.monetization_domains.join(" ").to_lowercase();
    let haystacks = [bio.as_str(), domains.as_str()];

    let offer = matched(OFFER_KEYWORDS, &haystacks);
    let niche = matched(NICHE_KEYWORDS, &haystacks);

    let mut total = keyword_points(offer.len(), OFFER_CAP) + keyword_points(niche.len(), NICHE_CAP);

    if profile.email.is_some() {
        total += EMAIL_POINTS;
    }
    if !profile.external_links.is_empty() {
        total += LINK_POINTS;
    }
    if let Some(days) = profile.last_post_days_ago {
        let active = policy.active_within_days.is_none_or(|limit| days <= limit);
        total += if active { ACTIVE_POINTS } else { STALE_PENALTY };
    }

    let has_contact = profile.has_link_or_email();
    if policy.require_link_or_email && !has_contact {
        total += NO_CONTACT_PENALTY;
    }

    let score = clamp_score(total);
    let reason = format!(
        "offer={}; niche={}; link_or_email={}; last_post_days={}",
        join_or_none(&offer),
        join_or_none(&niche),
        has_contact,
        profile
            .last_post_days_ago
            .map_or_else(|| "unknown".to_string(), |d| d.to_string()),
    );

    ScoreCard {
        score,
        reason,
        offer_keywords_matched: offer,
        niche_keywords_matched: niche,
    }
}

fn matched(vocabulary: &[&str], haystacks: &[&str]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|keyword| haystacks.iter().any(|text| text.contains(*keyword)))
        .map(|keyword| (*keyword).to_string())
        .collect()
}

fn clamp_score(total: i32) -> u8 {
    u8::try_from(total.clamp(0, 100)).unwrap_or(u8::MAX)
}

fn keyword_points(hits: usize, cap: i32) -> i32 {
    i32::try_from(hits)
        .unwrap_or(i32::MAX)
        .saturating_mul(KEYWORD_POINTS)
        .min(cap)
}

fn join_or_none(keywords: &[String]) -> String {
    if keywords.is_empty() {
        "none".to_string()
    } else {
        keywords.join("|")
    }
}
