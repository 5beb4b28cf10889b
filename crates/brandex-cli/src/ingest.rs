//! Input readers for post exports.
//!
//! The input kind is declared by the caller (`--format csv|json`), never
//! probed from the data. The CSV column schema is explicit: counter columns
//! are typed numerics that default to 0 on empty cells; identifier and URL
//! columns are opaque strings. Brand roster canonicalization happens here,
//! at the boundary, so the pipeline core never matches names.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use brandex_core::{BrandRoster, RawPostRecord, ReactionCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

/// One row of the wide posts CSV export.
#[derive(Debug, Deserialize)]
struct PostRow {
    post_id: String,
    #[serde(default)]
    page_id: String,
    #[serde(default)]
    page_name: String,
    #[serde(default)]
    page_url: String,
    #[serde(default)]
    created_time: String,
    #[serde(default)]
    reactions_like: Option<u64>,
    #[serde(default)]
    reactions_love: Option<u64>,
    #[serde(default)]
    reactions_care: Option<u64>,
    #[serde(default)]
    reactions_haha: Option<u64>,
    #[serde(default)]
    reactions_wow: Option<u64>,
    #[serde(default)]
    reactions_sad: Option<u64>,
    #[serde(default)]
    reactions_angry: Option<u64>,
    #[serde(default)]
    comment_count: Option<u64>,
    #[serde(default)]
    share_count: Option<u64>,
    /// Semicolon-separated brand tags on the post.
    #[serde(default)]
    tagged_brands: String,
    /// Semicolon-separated brand tags found in comments.
    #[serde(default)]
    comment_tagged_brands: String,
    #[serde(default)]
    comment_coverage: Option<f64>,
    #[serde(default)]
    unique_commenters: Option<u64>,
    #[serde(default)]
    reply_count: Option<u64>,
    #[serde(default)]
    median_reply_minutes: Option<f64>,
}

impl PostRow {
    fn into_record(self) -> RawPostRecord {
        RawPostRecord {
            post_id: self.post_id,
            page_id: self.page_id,
            page_name: self.page_name,
            page_url: self.page_url,
            created_time: self.created_time,
            reactions: ReactionCounts {
                like: self.reactions_like.unwrap_or(0),
                love: self.reactions_love.unwrap_or(0),
                care: self.reactions_care.unwrap_or(0),
                haha: self.reactions_haha.unwrap_or(0),
                wow: self.reactions_wow.unwrap_or(0),
                sad: self.reactions_sad.unwrap_or(0),
                angry: self.reactions_angry.unwrap_or(0),
            },
            comment_count: self.comment_count.unwrap_or(0),
            share_count: self.share_count.unwrap_or(0),
            tagged_brands: split_tags(&self.tagged_brands),
            comment_tagged_brands: split_tags(&self.comment_tagged_brands),
            comment_coverage: self.comment_coverage.unwrap_or(0.0).clamp(0.0, 1.0),
            unique_commenters: self.unique_commenters.unwrap_or(0),
            reply_count: self.reply_count.unwrap_or(0),
            median_reply_minutes: self.median_reply_minutes,
        }
    }
}

fn split_tags(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read a post export in the declared format, applying the optional roster.
///
/// # Errors
///
/// Fails on unreadable files or rows/documents that do not match the
/// declared schema.
pub fn read_posts(
    path: &Path,
    format: InputFormat,
    roster: Option<&BrandRoster>,
) -> Result<Vec<RawPostRecord>> {
    let mut records = match format {
        InputFormat::Csv => read_csv(path)?,
        InputFormat::Json => read_json(path)?,
    };
    if let Some(roster) = roster {
        for record in &mut records {
            canonicalize_record(record, roster);
        }
    }
    Ok(records)
}

fn read_csv(path: &Path) -> Result<Vec<RawPostRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open posts CSV at {}", path.display()))?;
    let mut records = Vec::new();
    for (line, row) in reader.deserialize::<PostRow>().enumerate() {
        let row = row.with_context(|| {
            format!("malformed row {} in {}", line + 2, path.display())
        })?;
        records.push(row.into_record());
    }
    Ok(records)
}

fn read_json(path: &Path) -> Result<Vec<RawPostRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read posts JSON at {}", path.display()))?;
    let mut records: Vec<RawPostRecord> = serde_json::from_str(&content)
        .with_context(|| format!("malformed posts JSON in {}", path.display()))?;
    for record in &mut records {
        record.comment_coverage = record.comment_coverage.clamp(0.0, 1.0);
    }
    Ok(records)
}

fn canonicalize_record(record: &mut RawPostRecord, roster: &BrandRoster) {
    if let Some(name) = roster.canonicalize(&record.page_name) {
        record.page_name = name.to_string();
    }
    for tag in record
        .tagged_brands
        .iter_mut()
        .chain(record.comment_tagged_brands.iter_mut())
    {
        if let Some(name) = roster.canonicalize(tag) {
            *tag = name.to_string();
        }
    }
}
