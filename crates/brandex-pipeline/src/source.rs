//! Owned/earned classification from the page URL shape.

use crate::types::SourceType;

/// Classify a page URL as owned or earned.
///
/// A URL whose path contains a `groups` segment denotes community-hosted
/// content and classifies as earned; everything else, including empty or
/// missing URLs, is owned. Pure function, no failure mode.
#[must_use]
pub fn classify_source(page_url: &str) -> SourceType {
    let url = page_url.trim();
    if url.is_empty() {
        return SourceType::Owned;
    }

    let rest = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };
    let path = rest.split(['?', '#']).next().unwrap_or("");

    // First segment is the host (or empty for path-only input); group
    // markers only count inside the path.
    let earned = path
        .split('/')
        .skip(1)
        .any(|segment| segment.eq_ignore_ascii_case("groups"));

    if earned {
        SourceType::Earned
    } else {
        SourceType::Owned
    }
}
