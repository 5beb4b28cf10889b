//! Grouping scored posts into (period, source, brand) aggregates.
//!
//! Grouping is a deterministic multiset reduction: bucket members are sorted
//! by post id before the floating-point fold, so any permutation of the
//! input produces bit-identical aggregates. Buckets are written once; no two
//! groups merge or split based on processing order.

use std::collections::BTreeMap;

use crate::period::PeriodKey;
use crate::scorer::exposure_weight;
use crate::types::{BrandPeriodAggregate, ScoredPost, SourceType};

/// Minimum depth coverage for a group's depth average to count as scored.
pub const DEPTH_SCORED_MIN: f64 = 0.6;
/// Minimum service coverage for a group's service average to count as scored.
pub const SERVICE_SCORED_MIN: f64 = 0.5;

/// Exposure-weighted running mean. Absent (not zero) when no weight
/// accumulated.
#[derive(Debug, Default)]
struct WeightedMean {
    numerator: f64,
    weight_sum: f64,
}

impl WeightedMean {
    fn add(&mut self, weight: f64, value: f64) {
        self.numerator += weight * value;
        self.weight_sum += weight;
    }

    fn mean(&self) -> Option<f64> {
        if self.weight_sum > 0.0 {
            Some(self.numerator / self.weight_sum)
        } else {
            None
        }
    }
}

/// Group scored posts and compute the per-group sums, coverage ratios,
/// reliability flags, and exposure-weighted averages.
///
/// Rows come back sorted by (period, source, brand).
#[must_use]
pub fn aggregate_scored(scored: &[ScoredPost]) -> Vec<BrandPeriodAggregate> {
    let mut groups: BTreeMap<(PeriodKey, SourceType, String), Vec<&ScoredPost>> = BTreeMap::new();
    for post in scored {
        groups
            .entry((post.period.clone(), post.source, post.brand.clone()))
            .or_default()
            .push(post);
    }

    groups
        .into_iter()
        .map(|((period, source, brand), mut members)| {
            members.sort_by(|a, b| a.post_id.cmp(&b.post_id));
            reduce_group(period, source, brand, &members)
        })
        .collect()
}

fn reduce_group(
    period: PeriodKey,
    source: SourceType,
    brand: String,
    members: &[&ScoredPost],
) -> BrandPeriodAggregate {
    let mut reactions_sum = 0u64;
    let mut comments_sum = 0u64;
    let mut shares_sum = 0u64;
    let mut ep_sum = 0u64;
    let mut advocacy_sum = 0u64;
    let mut depth_covered = 0u64;
    let mut service_covered = 0u64;

    let mut sentiment = WeightedMean::default();
    let mut depth = WeightedMean::default();
    let mut service = WeightedMean::default();
    let mut composite = WeightedMean::default();

    for post in members {
        reactions_sum += post.reactions;
        comments_sum += post.comments;
        shares_sum += post.shares;
        ep_sum += post.components.ep;
        advocacy_sum += post.components.advocacy;

        let weight = exposure_weight(post.components.ep);
        sentiment.add(weight, post.components.sentiment);
        composite.add(weight, post.composite);

        // Covered posts contribute to both the numerator and the weight-sum
        // denominator; uncovered posts contribute to neither.
        if post.components.depth_available {
            depth_covered += 1;
            depth.add(weight, post.components.depth);
        }
        if post.components.service_available {
            service_covered += 1;
            service.add(weight, post.components.service);
        }
    }

    let post_count = members.len() as u64;
    let depth_coverage = coverage(depth_covered, post_count);
    let service_coverage = coverage(service_covered, post_count);

    BrandPeriodAggregate {
        period,
        source,
        brand,
        post_count,
        reactions_sum,
        comments_sum,
        shares_sum,
        ep_sum,
        advocacy_sum,
        depth_covered,
        service_covered,
        depth_coverage,
        service_coverage,
        depth_scored: depth_coverage >= DEPTH_SCORED_MIN,
        service_scored: service_coverage >= SERVICE_SCORED_MIN,
        sentiment_avg: sentiment.mean(),
        depth_avg: depth.mean(),
        service_avg: service.mean(),
        composite_avg: composite.mean(),
        bes_index: None,
    }
}

#[allow(clippy::cast_precision_loss)]
fn coverage(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use brandex_core::PeriodMode;

    use crate::period::period_key;
    use crate::types::{Confidence, PostComponents};

    use super::*;

    fn make_post(post_id: &str, brand: &str, day: &str, components: PostComponents) -> ScoredPost {
        ScoredPost {
            post_id: post_id.to_string(),
            brand: brand.to_string(),
            confidence: Confidence::PostTag,
            source: SourceType::Owned,
            period: period_key(day, PeriodMode::Week).unwrap(),
            reactions: 10,
            comments: 4,
            shares: 2,
            components,
            composite: 1.0,
        }
    }

    fn make_components(ep: u64) -> PostComponents {
        PostComponents {
            ep,
            advocacy: 2,
            sentiment: 0.5,
            depth: 1.5,
            depth_available: true,
            service: 0.3,
            service_available: true,
        }
    }

    #[test]
    fn post_count_matches_group_membership() {
        let posts = vec![
            make_post("a", "Prime Bank", "2024-03-04", make_components(10)),
            make_post("b", "Prime Bank", "2024-03-05", make_components(20)),
            make_post("c", "BRAC Bank", "2024-03-05", make_components(30)),
        ];
        let rows = aggregate_scored(&posts);
        assert_eq!(rows.len(), 2);
        let prime = rows.iter().find(|r| r.brand == "Prime Bank").unwrap();
        assert_eq!(prime.post_count, 2);
        assert_eq!(prime.ep_sum, 30);
        assert_eq!(prime.reactions_sum, 20);
    }

    #[test]
    fn groups_split_by_period_and_source() {
        let mut earned = make_post("a", "Prime Bank", "2024-03-04", make_components(10));
        earned.source = SourceType::Earned;
        let posts = vec![
            earned,
            make_post("b", "Prime Bank", "2024-03-04", make_components(10)),
            make_post("c", "Prime Bank", "2024-04-01", make_components(10)),
        ];
        let rows = aggregate_scored(&posts);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn coverage_ratios_and_gates() {
        let covered = make_components(10);
        let mut uncovered = make_components(10);
        uncovered.depth_available = false;
        uncovered.service_available = false;

        // 2 of 3 depth-covered (0.667 >= 0.6), 2 of 3 service-covered
        // (0.667 >= 0.5).
        let posts = vec![
            make_post("a", "Prime Bank", "2024-03-04", covered),
            make_post("b", "Prime Bank", "2024-03-04", covered),
            make_post("c", "Prime Bank", "2024-03-04", uncovered),
        ];
        let rows = aggregate_scored(&posts);
        let row = &rows[0];
        assert_eq!(row.depth_covered, 2);
        assert!((row.depth_coverage - 2.0 / 3.0).abs() < 1e-12);
        assert!(row.depth_scored);
        assert!(row.service_scored);

        // 1 of 3: below both gates, but the partial averages are present.
        let posts = vec![
            make_post("a", "Prime Bank", "2024-03-04", covered),
            make_post("b", "Prime Bank", "2024-03-04", uncovered),
            make_post("c", "Prime Bank", "2024-03-04", uncovered),
        ];
        let rows = aggregate_scored(&posts);
        let row = &rows[0];
        assert!(!row.depth_scored);
        assert!(!row.service_scored);
        assert!(row.depth_avg.is_some());
    }

    #[test]
    fn depth_average_absent_when_no_post_covered() {
        let mut components = make_components(10);
        components.depth_available = false;
        let posts = vec![make_post("a", "Prime Bank", "2024-03-04", components)];
        let rows = aggregate_scored(&posts);
        assert!(rows[0].depth_avg.is_none());
        assert!(!rows[0].depth_scored);
        assert!((rows[0].depth_coverage - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_ep_posts_leave_averages_absent_not_zero() {
        // ln(1+0) = 0 weight for every member, including the service-covered
        // one: the weight-sum is 0, so every average is absent.
        let components = make_components(0);
        let posts = vec![make_post("a", "Prime Bank", "2024-03-04", components)];
        let rows = aggregate_scored(&posts);
        assert!(rows[0].sentiment_avg.is_none());
        assert!(rows[0].composite_avg.is_none());
        assert!(rows[0].service_avg.is_none());
        assert_eq!(rows[0].service_covered, 1);
    }

    #[test]
    fn weighted_average_favors_high_exposure_posts() {
        let mut low = make_components(1);
        low.sentiment = -1.0;
        let mut high = make_components(1000);
        high.sentiment = 1.0;
        let posts = vec![
            make_post("a", "Prime Bank", "2024-03-04", low),
            make_post("b", "Prime Bank", "2024-03-04", high),
        ];
        let rows = aggregate_scored(&posts);
        let avg = rows[0].sentiment_avg.unwrap();
        assert!(avg > 0.5, "high-EP post should dominate, got {avg}");
    }

    #[test]
    fn aggregation_is_permutation_invariant_bit_for_bit() {
        let mut posts = vec![
            make_post("a", "Prime Bank", "2024-03-04", make_components(7)),
            make_post("b", "Prime Bank", "2024-03-05", make_components(19)),
            make_post("c", "Prime Bank", "2024-03-06", make_components(311)),
            make_post("d", "BRAC Bank", "2024-03-06", make_components(23)),
        ];
        let forward = aggregate_scored(&posts);
        posts.reverse();
        let reversed = aggregate_scored(&posts);
        posts.swap(0, 2);
        let shuffled = aggregate_scored(&posts);

        for other in [&reversed, &shuffled] {
            assert_eq!(forward.len(), other.len());
            for (x, y) in forward.iter().zip(other.iter()) {
                assert_eq!(x.brand, y.brand);
                assert_eq!(x.post_count, y.post_count);
                assert_eq!(
                    x.sentiment_avg.map(f64::to_bits),
                    y.sentiment_avg.map(f64::to_bits)
                );
                assert_eq!(
                    x.composite_avg.map(f64::to_bits),
                    y.composite_avg.map(f64::to_bits)
                );
                assert_eq!(
                    x.depth_avg.map(f64::to_bits),
                    y.depth_avg.map(f64::to_bits)
                );
            }
        }
    }

    #[test]
    fn rows_sorted_by_period_source_brand() {
        let posts = vec![
            make_post("a", "City Bank", "2024-03-11", make_components(5)),
            make_post("b", "BRAC Bank", "2024-03-11", make_components(5)),
            make_post("c", "Prime Bank", "2024-03-04", make_components(5)),
        ];
        let rows = aggregate_scored(&posts);
        assert_eq!(rows[0].brand, "Prime Bank");
        assert_eq!(rows[1].brand, "BRAC Bank");
        assert_eq!(rows[2].brand, "City Bank");
        assert!(rows[0].period < rows[1].period);
    }
}
