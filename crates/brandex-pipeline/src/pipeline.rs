//! Pipeline orchestration: raw records in, scored posts and aggregates out.

use brandex_core::{ConfigError, RawPostRecord, ScoreConfig};

use crate::aggregate::aggregate_scored;
use crate::attribution::resolve_attributions;
use crate::normalize::normalize_aggregates;
use crate::period::period_key;
use crate::scorer::{composite, score_components};
use crate::source::classify_source;
use crate::types::{PipelineOutput, RunSummary, ScoredPost};

/// Run the full scoring pipeline over a materialized input collection.
///
/// 1. Validate the configuration; nothing is processed on failure.
/// 2. Key, classify, attribute, and score each record. Records with an
///    unparseable timestamp, or with no attribution under the default
///    policy, are skipped and counted, never failed.
/// 3. Group by (period, source, brand) and normalize the composite averages
///    into the bounded index.
///
/// Skips are accounted for in the returned [`RunSummary`]; the summary also
/// echoes the effective configuration (weights rescaled to sum to 1).
///
/// # Errors
///
/// Returns [`ConfigError`] when the configuration fails validation.
pub fn run(records: &[RawPostRecord], config: &ScoreConfig) -> Result<PipelineOutput, ConfigError> {
    config.validate()?;
    let effective = config.effective();

    let mut scored = Vec::with_capacity(records.len());
    let mut skipped_bad_timestamp = 0usize;
    let mut skipped_unattributed = 0usize;

    for record in records {
        let Some(period) = period_key(&record.created_time, effective.period) else {
            skipped_bad_timestamp += 1;
            tracing::debug!(
                post_id = %record.post_id,
                created = %record.created_time,
                "unparseable timestamp, record skipped"
            );
            continue;
        };

        let source = classify_source(&record.page_url);
        let attributions = resolve_attributions(record, source, effective.include_unattributed);
        if attributions.is_empty() {
            skipped_unattributed += 1;
            tracing::debug!(post_id = %record.post_id, "unattributed, record skipped");
            continue;
        }

        let components = score_components(record, effective.depth_coverage_threshold);
        let value = composite(&components, &effective.weights);

        for attribution in attributions {
            scored.push(ScoredPost {
                post_id: record.post_id.clone(),
                brand: attribution.brand,
                confidence: attribution.confidence,
                source,
                period: period.clone(),
                reactions: record.reactions.total(),
                comments: record.comment_count,
                shares: record.share_count,
                components,
                composite: value,
            });
        }
    }

    let mut aggregates = aggregate_scored(&scored);
    normalize_aggregates(&mut aggregates, effective.normalization);

    tracing::info!(
        input = records.len(),
        scored = scored.len(),
        aggregates = aggregates.len(),
        skipped_bad_timestamp,
        skipped_unattributed,
        "scoring run complete"
    );

    let summary = RunSummary {
        input_posts: records.len(),
        scored_posts: scored.len(),
        aggregate_rows: aggregates.len(),
        skipped_bad_timestamp,
        skipped_unattributed,
        config: effective,
    };

    Ok(PipelineOutput {
        scored,
        aggregates,
        summary,
    })
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
