//! Substring search over the hadith index.
//!
//! English text and collection name match case-insensitively. Arabic text
//! matches the query verbatim, since lowercasing has no meaning there.
//! Results keep index order.

use super::artifacts::HadithEntry;

/// Hadiths shown when the query is empty.
pub const SAMPLE_LEN: usize = 10;

/// Default cap on results.
pub const DEFAULT_LIMIT: usize = 50;

/// Find at most `limit` hadiths matching `query`.
///
/// An empty query returns the first [`SAMPLE_LEN`] hadiths as samples.
#[must_use]
pub fn search_hadiths<'a>(index: &'a [HadithEntry], query: &str, limit: usize) -> Vec<&'a HadithEntry> {
    let query = query.trim();
    if query.is_empty() {
        return index.iter().take(SAMPLE_LEN.min(limit)).collect();
    }

    let folded = query.to_lowercase();
    index
        .iter()
        .filter(|h| {
            h.text_en.to_lowercase().contains(&folded)
                || h.text_ar.contains(query)
                || h.source.to_lowercase().contains(&folded)
        })
        .take(limit)
        .collect()
}
