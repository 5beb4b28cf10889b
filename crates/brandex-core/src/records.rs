//! Raw input records.
//!
//! The field schema is explicit: engagement counters are typed numerics that
//! default to 0 when absent in the input, while identifier and URL fields are
//! opaque strings that are never coerced.

use serde::{Deserialize, Serialize};

/// Per-category reaction counters for one post.
///
/// The polarity split is fixed policy: like, love, care, haha and wow count
/// toward the positive total; sad and angry toward the negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionCounts {
    pub like: u64,
    pub love: u64,
    pub care: u64,
    pub haha: u64,
    pub wow: u64,
    pub sad: u64,
    pub angry: u64,
}

impl ReactionCounts {
    #[must_use]
    pub fn positive_total(&self) -> u64 {
        self.like + self.love + self.care + self.haha + self.wow
    }

    #[must_use]
    pub fn negative_total(&self) -> u64 {
        self.sad + self.angry
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.positive_total() + self.negative_total()
    }
}

/// One observed social post. Immutable once ingested.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPostRecord {
    pub post_id: String,
    pub page_id: String,
    /// Display name of the publishing page. Used as the owned-post
    /// attribution fallback.
    pub page_name: String,
    pub page_url: String,
    /// Creation timestamp as exported. Parsed by the period keyer; records
    /// with unparseable timestamps are skipped, not failed.
    pub created_time: String,
    pub reactions: ReactionCounts,
    pub comment_count: u64,
    pub share_count: u64,
    /// Explicit brand tags on the post itself. One entry is a single-brand
    /// tag; more than one is a multi-brand tag list.
    pub tagged_brands: Vec<String>,
    /// Brand tags found in the post's comments. May contain repeats.
    pub comment_tagged_brands: Vec<String>,
    /// Fraction of the comment export captured for this post, in [0, 1].
    pub comment_coverage: f64,
    pub unique_commenters: u64,
    pub reply_count: u64,
    /// Median time-to-first-reply in minutes, when the page replied at all.
    pub median_reply_minutes: Option<f64>,
}
