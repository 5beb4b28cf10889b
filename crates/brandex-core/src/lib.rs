//! Shared domain types and configuration for the brandex workspace.
//!
//! Holds the raw post record schema consumed by the pipeline, the scoring
//! configuration with its validation rules, and the brand roster used by the
//! ingest boundary to canonicalize page names and tags.

pub mod brands;
pub mod config;
pub mod error;
pub mod records;

pub use brands::{load_roster, BrandEntry, BrandRoster, RosterFile};
pub use config::{ComponentWeights, NormalizationMode, PeriodMode, ScoreConfig};
pub use error::ConfigError;
pub use records::{RawPostRecord, ReactionCounts};
