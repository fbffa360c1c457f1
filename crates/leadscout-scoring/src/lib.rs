//! Lead scoring and retention rules for extracted profiles.
//!
//! Both halves are pure: [`score_profile`] maps a profile to a [`ScoreCard`]
//! and [`should_keep`] gates a scored profile. Neither touches I/O.
//!
//! [`ScoreCard`]: leadscout_core::ScoreCard

pub mod retention;
pub mod scorer;

pub use retention::{should_keep, RetentionPolicy};
pub use scorer::{score_profile, ScorePolicy, NICHE_KEYWORDS, OFFER_KEYWORDS};
