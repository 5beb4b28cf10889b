//! Brand attribution: which brand(s) a post is credited to, and how
//! confidently.
//!
//! Owned and earned posts use different tier orderings. Owned pages are a
//! reliable identity signal, so an untagged owned post falls back to the
//! page's own name; earned group/community names are not brand signals and
//! never attribute.

use std::collections::BTreeSet;

use brandex_core::RawPostRecord;

use crate::types::{Attribution, Confidence, SourceType};

/// Sentinel brand label emitted for unattributed posts kept under the
/// inclusion flag.
pub const UNATTRIBUTED: &str = "Unattributed";

/// Resolve a raw post to zero or more attributions, first match winning per
/// source type.
///
/// Owned precedence: explicit single-brand tag, then page name, then
/// unattributed. Earned precedence: explicit single-brand tag, then the
/// multi-brand tag list (one attribution per listed brand), then the
/// deduplicated union of comment tags (one per brand), then unattributed.
///
/// Unattributed posts yield an empty vec under the default policy; with
/// `include_unattributed` they yield a single synthetic record under
/// [`UNATTRIBUTED`] with confidence `none`.
#[must_use]
pub fn resolve_attributions(
    record: &RawPostRecord,
    source: SourceType,
    include_unattributed: bool,
) -> Vec<Attribution> {
    let tags: Vec<&str> = record
        .tagged_brands
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();

    let resolved = match source {
        SourceType::Owned => resolve_owned(record, &tags),
        SourceType::Earned => resolve_earned(record, &tags),
    };

    if resolved.is_empty() && include_unattributed {
        return vec![Attribution {
            brand: UNATTRIBUTED.to_string(),
            confidence: Confidence::None,
        }];
    }
    resolved
}

fn resolve_owned(record: &RawPostRecord, tags: &[&str]) -> Vec<Attribution> {
    if let [tag] = tags {
        return vec![Attribution {
            brand: (*tag).to_string(),
            confidence: Confidence::PostTag,
        }];
    }

    let page = record.page_name.trim();
    if !page.is_empty() {
        return vec![Attribution {
            brand: page.to_string(),
            confidence: Confidence::PageName,
        }];
    }

    Vec::new()
}

fn resolve_earned(record: &RawPostRecord, tags: &[&str]) -> Vec<Attribution> {
    match tags {
        [] => {}
        [tag] => {
            return vec![Attribution {
                brand: (*tag).to_string(),
                confidence: Confidence::PostTag,
            }]
        }
        many => {
            // Deduplicate so a repeated tag cannot credit the same brand
            // twice for one post.
            let unique: BTreeSet<&str> = many.iter().copied().collect();
            return unique
                .into_iter()
                .map(|brand| Attribution {
                    brand: brand.to_string(),
                    confidence: Confidence::PostTagList,
                })
                .collect();
        }
    }

    let comment_union: BTreeSet<&str> = record
        .comment_tagged_brands
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if !comment_union.is_empty() {
        return comment_union
            .into_iter()
            .map(|brand| Attribution {
                brand: brand.to_string(),
                confidence: Confidence::CommentTag,
            })
            .collect();
    }

    Vec::new()
}
