//! Output writers: scored posts CSV, aggregates CSV, run summary JSON.
//!
//! Rows are flattened into explicit serializable structs; absent averages
//! serialize as empty cells, never as zero.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use brandex_pipeline::{BrandPeriodAggregate, RunSummary, ScoredPost};

#[derive(Debug, Serialize)]
struct ScoredRow<'a> {
    post_id: &'a str,
    brand: &'a str,
    confidence: String,
    source: String,
    period: &'a str,
    reactions: u64,
    comments: u64,
    shares: u64,
    ep: u64,
    advocacy: u64,
    sentiment: f64,
    depth: f64,
    depth_available: bool,
    service: f64,
    service_available: bool,
    composite: f64,
}

impl<'a> From<&'a ScoredPost> for ScoredRow<'a> {
    fn from(post: &'a ScoredPost) -> Self {
        Self {
            post_id: &post.post_id,
            brand: &post.brand,
            confidence: post.confidence.to_string(),
            source: post.source.to_string(),
            period: post.period.as_str(),
            reactions: post.reactions,
            comments: post.comments,
            shares: post.shares,
            ep: post.components.ep,
            advocacy: post.components.advocacy,
            sentiment: post.components.sentiment,
            depth: post.components.depth,
            depth_available: post.components.depth_available,
            service: post.components.service,
            service_available: post.components.service_available,
            composite: post.composite,
        }
    }
}

#[derive(Debug, Serialize)]
struct AggregateRow<'a> {
    period: &'a str,
    source: String,
    brand: &'a str,
    post_count: u64,
    reactions_sum: u64,
    comments_sum: u64,
    shares_sum: u64,
    ep_sum: u64,
    advocacy_sum: u64,
    depth_covered: u64,
    service_covered: u64,
    depth_coverage: f64,
    service_coverage: f64,
    depth_scored: bool,
    service_scored: bool,
    sentiment_avg: Option<f64>,
    depth_avg: Option<f64>,
    service_avg: Option<f64>,
    composite_avg: Option<f64>,
    bes_index: Option<f64>,
}

impl<'a> From<&'a BrandPeriodAggregate> for AggregateRow<'a> {
    fn from(row: &'a BrandPeriodAggregate) -> Self {
        Self {
            period: row.period.as_str(),
            source: row.source.to_string(),
            brand: &row.brand,
            post_count: row.post_count,
            reactions_sum: row.reactions_sum,
            comments_sum: row.comments_sum,
            shares_sum: row.shares_sum,
            ep_sum: row.ep_sum,
            advocacy_sum: row.advocacy_sum,
            depth_covered: row.depth_covered,
            service_covered: row.service_covered,
            depth_coverage: row.depth_coverage,
            service_coverage: row.service_coverage,
            depth_scored: row.depth_scored,
            service_scored: row.service_scored,
            sentiment_avg: row.sentiment_avg,
            depth_avg: row.depth_avg,
            service_avg: row.service_avg,
            composite_avg: row.composite_avg,
            bes_index: row.bes_index,
        }
    }
}

/// Write the post-level output for ranking/top-N consumers.
///
/// # Errors
///
/// Fails if the file cannot be created or a row cannot be serialized.
pub fn write_scored_csv(path: &Path, scored: &[ScoredPost]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for post in scored {
        writer.serialize(ScoredRow::from(post))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the brand × period × source aggregate table.
///
/// # Errors
///
/// Fails if the file cannot be created or a row cannot be serialized.
pub fn write_aggregates_csv(path: &Path, rows: &[BrandPeriodAggregate]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(AggregateRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the run summary as pretty-printed JSON.
///
/// # Errors
///
/// Fails if the file cannot be created or the summary cannot be serialized.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}
