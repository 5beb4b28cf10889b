//! Records produced and consumed along the pipeline.

use serde::{Deserialize, Serialize};

use brandex_core::ScoreConfig;

use crate::period::PeriodKey;

/// Where a post was published relative to the brand it is credited to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Published on the brand's own channel.
    Owned,
    /// Hosted externally, attributed to a brand via tagging.
    Earned,
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceType::Owned => write!(f, "owned"),
            SourceType::Earned => write!(f, "earned"),
        }
    }
}

/// How strongly an attribution is supported, highest tier first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Explicit single-brand tag on the post.
    PostTag,
    /// Derived from the page's own display name (owned posts only).
    PageName,
    /// One of an explicit multi-brand tag list.
    PostTagList,
    /// Brand tag found only in the post's comments.
    CommentTag,
    /// Synthetic record for an unattributed post kept under the inclusion
    /// flag.
    None,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Confidence::PostTag => "post_tag",
            Confidence::PageName => "page_name",
            Confidence::PostTagList => "post_tag_list",
            Confidence::CommentTag => "comment_tag",
            Confidence::None => "none",
        };
        write!(f, "{s}")
    }
}

/// One (brand, confidence) credit resolved from a raw post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub brand: String,
    pub confidence: Confidence,
}

/// Per-post sub-scores computed from the raw counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostComponents {
    /// Engagement points: reactions + 2·comments + 3·shares.
    pub ep: u64,
    /// Shares, plus one when any comment carries a brand tag.
    pub advocacy: u64,
    /// Reaction-polarity proxy in [-1, 1].
    pub sentiment: f64,
    /// ln(1+unique commenters) + ln(1+replies); 0 when not available.
    pub depth: f64,
    /// Whether comment-export coverage met the per-post depth gate.
    pub depth_available: bool,
    /// 1 / ln(2 + median reply minutes); 0 when not available.
    pub service: f64,
    /// Whether a usable median reply time was present.
    pub service_available: bool,
}

/// One attribution of one post, fully scored. A raw post with N attributions
/// yields N of these, identical except for the brand credited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPost {
    pub post_id: String,
    pub brand: String,
    pub confidence: Confidence,
    pub source: SourceType,
    pub period: PeriodKey,
    pub reactions: u64,
    pub comments: u64,
    pub shares: u64,
    #[serde(flatten)]
    pub components: PostComponents,
    /// Weighted composite of the components, before normalization.
    pub composite: f64,
}

/// The output unit: one (period, source, brand) group.
///
/// Write-once during the grouping pass; normalization may populate
/// `bes_index` afterward and never alters any other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandPeriodAggregate {
    pub period: PeriodKey,
    pub source: SourceType,
    pub brand: String,
    pub post_count: u64,
    pub reactions_sum: u64,
    pub comments_sum: u64,
    pub shares_sum: u64,
    pub ep_sum: u64,
    pub advocacy_sum: u64,
    /// Posts whose depth component was available.
    pub depth_covered: u64,
    /// Posts whose service component was available.
    pub service_covered: u64,
    pub depth_coverage: f64,
    pub service_coverage: f64,
    pub depth_scored: bool,
    pub service_scored: bool,
    /// Exposure-weighted averages; absent when the relevant weight-sum is 0.
    pub sentiment_avg: Option<f64>,
    pub depth_avg: Option<f64>,
    pub service_avg: Option<f64>,
    pub composite_avg: Option<f64>,
    /// Bounded [0, 100] index, populated by the normalizer.
    pub bes_index: Option<f64>,
}

/// Run accounting, returned as a value rather than accumulated in shared
/// state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub input_posts: usize,
    pub scored_posts: usize,
    pub aggregate_rows: usize,
    pub skipped_bad_timestamp: usize,
    pub skipped_unattributed: usize,
    /// The configuration actually applied (weights rescaled to sum to 1).
    pub config: ScoreConfig,
}

/// Everything a scoring run produces.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    pub scored: Vec<ScoredPost>,
    pub aggregates: Vec<BrandPeriodAggregate>,
    pub summary: RunSummary,
}
