//! Bounded-index normalization within (period, source) buckets.
//!
//! Rescales each bucket's composite averages across brands to [0, 100] and
//! writes the result into the separate index field; the raw composite
//! average is never altered. Rows with an absent composite average take no
//! part in their bucket and keep an unset index.

use std::collections::BTreeMap;

use brandex_core::NormalizationMode;

use crate::period::PeriodKey;
use crate::types::{BrandPeriodAggregate, SourceType};

/// Populate `bes_index` on every row per the configured mode.
pub fn normalize_aggregates(rows: &mut [BrandPeriodAggregate], mode: NormalizationMode) {
    if mode == NormalizationMode::None {
        return;
    }

    let mut buckets: BTreeMap<(PeriodKey, SourceType), Vec<(usize, f64)>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if let Some(value) = row.composite_avg {
            buckets
                .entry((row.period.clone(), row.source))
                .or_default()
                .push((idx, value));
        }
    }

    for members in buckets.values() {
        match mode {
            NormalizationMode::MinMax => min_max(rows, members),
            NormalizationMode::ZScore => z_logistic(rows, members),
            NormalizationMode::None => {}
        }
    }
}

fn min_max(rows: &mut [BrandPeriodAggregate], members: &[(usize, f64)]) {
    let min = members.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
    let max = members
        .iter()
        .map(|&(_, v)| v)
        .fold(f64::NEG_INFINITY, f64::max);

    for &(idx, value) in members {
        // All brands tied: the bucket carries no spread to express.
        let index = if max > min {
            100.0 * (value - min) / (max - min)
        } else {
            50.0
        };
        rows[idx].bes_index = Some(index);
    }
}

fn z_logistic(rows: &mut [BrandPeriodAggregate], members: &[(usize, f64)]) {
    #[allow(clippy::cast_precision_loss)]
    let n = members.len() as f64;

    let mean = members.iter().map(|&(_, v)| v).sum::<f64>() / n;
    // Sample standard deviation; undefined spread collapses to z = 0.
    let variance = if members.len() < 2 {
        0.0
    } else {
        members
            .iter()
            .map(|&(_, v)| (v - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0)
    };
    let sd = variance.sqrt();

    for &(idx, value) in members {
        let z = if sd > 0.0 { (value - mean) / sd } else { 0.0 };
        rows[idx].bes_index = Some(logistic(z));
    }
}

/// Logistic squash of a z-score onto [0, 100]; z = 0 maps to exactly 50.
fn logistic(z: f64) -> f64 {
    100.0 / (1.0 + (-z).exp())
}
