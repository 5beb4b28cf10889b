//! Per-post component scores and the weighted composite.
//!
//! All components are pure functions of one record's counters. Engagement
//! and advocacy are log-squashed in the composite because raw counts are
//! heavy-tailed; a viral outlier would otherwise dominate a period average.

use brandex_core::{ComponentWeights, RawPostRecord};

use crate::types::PostComponents;

/// Compute the five sub-scores for one post.
///
/// `depth_coverage_threshold` is the per-post scoring-eligibility gate for
/// the conversation-depth component (distinct from the aggregate reliability
/// gates in [`crate::aggregate`]).
#[must_use]
pub fn score_components(record: &RawPostRecord, depth_coverage_threshold: f64) -> PostComponents {
    let reactions = record.reactions.total();
    let ep = reactions + 2 * record.comment_count + 3 * record.share_count;

    let has_comment_tag = record
        .comment_tagged_brands
        .iter()
        .any(|t| !t.trim().is_empty());
    let advocacy = record.share_count + u64::from(has_comment_tag);

    #[allow(clippy::cast_precision_loss)]
    let sentiment = (record.reactions.positive_total() as f64
        - record.reactions.negative_total() as f64)
        / reactions.max(1) as f64;

    let depth_available = record.comment_coverage >= depth_coverage_threshold;
    let depth = if depth_available {
        ln1p(record.unique_commenters) + ln1p(record.reply_count)
    } else {
        0.0
    };

    let service_minutes = record
        .median_reply_minutes
        .filter(|m| m.is_finite() && *m >= 0.0);
    let service_available = service_minutes.is_some();
    let service = service_minutes.map_or(0.0, |m| 1.0 / (2.0 + m).ln());

    PostComponents {
        ep,
        advocacy,
        sentiment,
        depth,
        depth_available,
        service,
        service_available,
    }
}

/// Blend the components into the raw composite using rescaled weights.
#[must_use]
pub fn composite(components: &PostComponents, weights: &ComponentWeights) -> f64 {
    weights.eng * ln1p(components.ep)
        + weights.adv * ln1p(components.advocacy)
        + weights.sent * components.sentiment
        + weights.depth * components.depth
        + weights.service * components.service
}

/// Exposure proxy used as the aggregation weight for one post.
#[must_use]
pub fn exposure_weight(ep: u64) -> f64 {
    ln1p(ep)
}

#[allow(clippy::cast_precision_loss)]
fn ln1p(n: u64) -> f64 {
    (1.0 + n as f64).ln()
}

#[cfg(test)]
mod tests {
    use brandex_core::ReactionCounts;

    use super::*;

    fn make_record() -> RawPostRecord {
        RawPostRecord {
            post_id: "p1".to_string(),
            ..RawPostRecord::default()
        }
    }

    #[test]
    fn worked_owned_post_scenario() {
        // Love:10 Angry:2, 5 comments, 3 shares, coverage 0.9, 4 unique
        // authors, 6 replies, no reply time.
        let record = RawPostRecord {
            reactions: ReactionCounts {
                love: 10,
                angry: 2,
                ..ReactionCounts::default()
            },
            comment_count: 5,
            share_count: 3,
            comment_coverage: 0.9,
            unique_commenters: 4,
            reply_count: 6,
            median_reply_minutes: None,
            ..make_record()
        };
        let c = score_components(&record, 0.6);

        assert_eq!(c.ep, 31); // 12 + 2*5 + 3*3
        assert!((c.sentiment - 8.0 / 12.0).abs() < 1e-12);
        assert!(c.depth_available);
        assert!((c.depth - (5.0_f64.ln() + 7.0_f64.ln())).abs() < 1e-12);
        assert!(!c.service_available);
        assert!((c.service - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn advocacy_counts_comment_tag_bonus() {
        let mut record = make_record();
        record.share_count = 3;
        assert_eq!(score_components(&record, 0.6).advocacy, 3);

        record.comment_tagged_brands = vec!["Prime Bank".to_string()];
        assert_eq!(score_components(&record, 0.6).advocacy, 4);
    }

    #[test]
    fn sentiment_is_bounded_when_reactions_present() {
        let record = RawPostRecord {
            reactions: ReactionCounts {
                love: 500,
                ..ReactionCounts::default()
            },
            ..make_record()
        };
        let c = score_components(&record, 0.6);
        assert!((-1.0..=1.0).contains(&c.sentiment));
        assert!((c.sentiment - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sentiment_division_floor_avoids_blowup_on_zero_reactions() {
        let c = score_components(&make_record(), 0.6);
        assert!((c.sentiment - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn depth_gated_by_coverage_threshold() {
        let record = RawPostRecord {
            comment_coverage: 0.5,
            unique_commenters: 9,
            reply_count: 9,
            ..make_record()
        };
        let below = score_components(&record, 0.6);
        assert!(!below.depth_available);
        assert!((below.depth - 0.0).abs() < f64::EPSILON);

        // Same record clears a lower per-post gate.
        let above = score_components(&record, 0.5);
        assert!(above.depth_available);
        assert!(above.depth > 0.0);
    }

    #[test]
    fn service_score_decreases_with_reply_time() {
        let fast = RawPostRecord {
            median_reply_minutes: Some(5.0),
            ..make_record()
        };
        let slow = RawPostRecord {
            median_reply_minutes: Some(500.0),
            ..make_record()
        };
        let f = score_components(&fast, 0.6);
        let s = score_components(&slow, 0.6);
        assert!(f.service_available && s.service_available);
        assert!(f.service > s.service);
        assert!(s.service > 0.0);
    }

    #[test]
    fn negative_or_nan_reply_time_is_unavailable() {
        for bad in [Some(-1.0), Some(f64::NAN), None] {
            let record = RawPostRecord {
                median_reply_minutes: bad,
                ..make_record()
            };
            let c = score_components(&record, 0.6);
            assert!(!c.service_available);
            assert!((c.service - 0.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn composite_blends_with_weights() {
        let components = PostComponents {
            ep: 31,
            advocacy: 3,
            sentiment: 0.5,
            depth: 2.0,
            depth_available: true,
            service: 0.25,
            service_available: true,
        };
        let weights = ComponentWeights {
            eng: 1.0,
            adv: 0.0,
            sent: 0.0,
            depth: 0.0,
            service: 0.0,
        };
        // With all weight on engagement the composite is just ln(1+EP).
        assert!((composite(&components, &weights) - 32.0_f64.ln()).abs() < 1e-12);

        let balanced = ComponentWeights::default();
        let expected = 0.30 * 32.0_f64.ln()
            + 0.20 * 4.0_f64.ln()
            + 0.20 * 0.5
            + 0.15 * 2.0
            + 0.15 * 0.25;
        assert!((composite(&components, &balanced) - expected).abs() < 1e-12);
    }

    #[test]
    fn exposure_weight_is_zero_for_zero_ep() {
        assert!((exposure_weight(0) - 0.0).abs() < f64::EPSILON);
        assert!(exposure_weight(1) > 0.0);
    }
}
