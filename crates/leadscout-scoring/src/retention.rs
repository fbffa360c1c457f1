//! Retention gate applied to scored profiles before they reach the sink.

use leadscout_core::{RunConfig, ScoredProfile};

/// Thresholds a scored profile must meet to be kept. `None` disables a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionPolicy {
    pub min_followers: Option<u64>,
    pub active_within_days: Option<u32>,
    pub require_link_or_email: bool,
}

impl From<&RunConfig> for RetentionPolicy {
    fn from(config: &RunConfig) -> Self {
        Self {
            min_followers: config.min_followers,
            active_within_days: config.active_within_days,
            require_link_or_email: config.require_link_or_email,
        }
    }
}

/// `true` when `scored` is public, meets the follower floor, has not gone
/// quiet past the activity window, and (if required) exposes a contact.
///
/// An unknown last-post age passes the activity check.
#[must_use]
pub fn should_keep(scored: &ScoredProfile, policy: &RetentionPolicy) -> bool {
    let profile = &scored.profile;

    if profile.is_private {
        return false;
    }
    if policy
        .min_followers
        .is_some_and(|min| profile.follower_count < min)
    {
        return false;
    }
    if let (Some(limit), Some(days)) = (policy.active_within_days, profile.last_post_days_ago) {
        if days > limit {
            return false;
        }
    }
    if policy.require_link_or_email && !profile.has_link_or_email() {
        return false;
    }
    true
}
