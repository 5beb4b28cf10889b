//! Brand Experience Score pipeline.
//!
//! Turns raw per-post engagement records into brand × period × source-type
//! aggregates with coverage-gated reliability flags. The pipeline is a
//! single-pass, synchronous transformation over an in-memory collection:
//! period keying, owned/earned classification, brand attribution, per-post
//! component scoring, a weighted composite, grouped aggregation, and
//! bounded-index normalization. No I/O happens inside this crate.

pub mod aggregate;
pub mod attribution;
pub mod normalize;
pub mod period;
pub mod pipeline;
pub mod scorer;
pub mod source;
pub mod types;

pub use aggregate::{aggregate_scored, DEPTH_SCORED_MIN, SERVICE_SCORED_MIN};
pub use attribution::{resolve_attributions, UNATTRIBUTED};
pub use normalize::normalize_aggregates;
pub use period::{period_key, sorted_periods, PeriodKey};
pub use pipeline::run;
pub use scorer::{composite, score_components};
pub use source::classify_source;
pub use types::{
    Attribution, BrandPeriodAggregate, Confidence, PipelineOutput, PostComponents, RunSummary,
    ScoredPost, SourceType,
};
