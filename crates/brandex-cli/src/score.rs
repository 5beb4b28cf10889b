//! The `score` subcommand: ingest, run the pipeline, write outputs.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;

use brandex_core::{
    load_roster, ComponentWeights, NormalizationMode, PeriodMode, ScoreConfig,
};
use brandex_pipeline::{sorted_periods, BrandPeriodAggregate};

use crate::ingest::{read_posts, InputFormat};
use crate::output::{write_aggregates_csv, write_scored_csv, write_summary_json};

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Post export to score
    #[arg(long)]
    pub posts: PathBuf,

    /// Input format of the post export
    #[arg(long, value_enum, default_value = "csv")]
    pub format: InputFormat,

    /// Brand roster YAML for canonicalizing page names and tags
    #[arg(long)]
    pub brands: Option<PathBuf>,

    /// YAML file with component weights (eng/adv/sent/depth/service)
    #[arg(long)]
    pub weights: Option<PathBuf>,

    /// Grouping granularity: week or month
    #[arg(long, default_value = "week")]
    pub period: String,

    /// Index normalization: minmax, zscore, or none
    #[arg(long, default_value = "minmax")]
    pub normalization: String,

    /// Keep unattributed posts under a sentinel brand instead of dropping
    /// them
    #[arg(long)]
    pub include_unattributed: bool,

    /// Per-post comment-export coverage gate for the depth component
    #[arg(long, default_value_t = 0.6)]
    pub depth_coverage_threshold: f64,

    /// Keep only the most recent N periods in the aggregate output
    #[arg(long)]
    pub recent: Option<usize>,

    /// Output directory
    #[arg(long, default_value = "out")]
    pub outdir: PathBuf,
}

pub fn run_score(args: &ScoreArgs) -> Result<()> {
    let config = ScoreConfig {
        period: parse_period(&args.period)?,
        normalization: parse_normalization(&args.normalization)?,
        include_unattributed: args.include_unattributed,
        depth_coverage_threshold: args.depth_coverage_threshold,
        weights: match &args.weights {
            Some(path) => load_weights(path)?,
            None => ComponentWeights::default(),
        },
    };

    let roster = match &args.brands {
        Some(path) => Some(load_roster(path)?),
        None => None,
    };

    let records = read_posts(&args.posts, args.format, roster.as_ref())?;
    tracing::info!(posts = records.len(), "input loaded");

    let mut output = brandex_pipeline::run(&records, &config)?;

    if let Some(n) = args.recent {
        output.aggregates = recent_periods(output.aggregates, n);
    }

    std::fs::create_dir_all(&args.outdir)
        .with_context(|| format!("failed to create output directory {}", args.outdir.display()))?;

    let scored_path = args.outdir.join("scored_posts.csv");
    let aggregates_path = args.outdir.join("aggregates.csv");
    let summary_path = args.outdir.join("run_summary.json");

    write_scored_csv(&scored_path, &output.scored)?;
    write_aggregates_csv(&aggregates_path, &output.aggregates)?;
    write_summary_json(&summary_path, &output.summary)?;

    println!(
        "scored {} of {} posts into {} aggregate rows ({} bad timestamps, {} unattributed skipped)",
        output.summary.scored_posts,
        output.summary.input_posts,
        output.aggregates.len(),
        output.summary.skipped_bad_timestamp,
        output.summary.skipped_unattributed,
    );
    for path in [&scored_path, &aggregates_path, &summary_path] {
        println!("  wrote: {}", path.display());
    }

    Ok(())
}

fn parse_period(raw: &str) -> Result<PeriodMode> {
    match raw {
        "week" => Ok(PeriodMode::Week),
        "month" => Ok(PeriodMode::Month),
        other => bail!("unrecognized period mode '{other}': expected 'week' or 'month'"),
    }
}

fn parse_normalization(raw: &str) -> Result<NormalizationMode> {
    match raw {
        "minmax" => Ok(NormalizationMode::MinMax),
        "zscore" => Ok(NormalizationMode::ZScore),
        "none" => Ok(NormalizationMode::None),
        other => {
            bail!("unrecognized normalization mode '{other}': expected 'minmax', 'zscore', or 'none'")
        }
    }
}

fn load_weights(path: &Path) -> Result<ComponentWeights> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read weights file at {}", path.display()))?;
    let weights: ComponentWeights = serde_yaml::from_str(&content)
        .with_context(|| format!("malformed weights file at {}", path.display()))?;
    Ok(weights)
}

/// Post-hoc chronological window: keep rows from the most recent `n`
/// periods. A pure filter over the period-sorted rows; the pipeline itself
/// never windows.
fn recent_periods(rows: Vec<BrandPeriodAggregate>, n: usize) -> Vec<BrandPeriodAggregate> {
    let periods = sorted_periods(rows.iter().map(|r| r.period.clone()));
    if n == 0 || periods.len() <= n {
        return rows;
    }
    let cutoff = periods[periods.len() - n].clone();
    rows.into_iter().filter(|r| r.period >= cutoff).collect()
}
