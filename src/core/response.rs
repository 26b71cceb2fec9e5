//! Discord message limits, truncation and paging helpers
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Add page slicing for long listings
//! - 1.0.0: Truncation helpers for message content and embeds

/// Discord embed description limit
pub const EMBED_LIMIT: usize = 4096;
/// Discord embed field value limit
pub const EMBED_FIELD_LIMIT: usize = 1024;
/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Truncate text to `limit` bytes on a UTF-8 boundary, adding an ellipsis if cut
pub fn truncate_to(text: &str, limit: usize) -> String {
    if text.len() <= limit {
        return text.to_string();
    }

    // Room for "..."
    let mut end = limit.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Truncate text to fit embed limit, adding ellipsis if needed
pub fn truncate_for_embed(text: &str) -> String {
    truncate_to(text, EMBED_LIMIT)
}

/// Truncate text to fit message limit, adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    truncate_to(text, MESSAGE_LIMIT)
}

/// A single page out of a longer list of entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number, clamped into range
    pub number: usize,
    pub total: usize,
}

/// Slice `entries` into pages of `per_page` and return the requested 1-based page.
///
/// Out-of-range page numbers are clamped to the first/last page. An empty list
/// yields a single empty page.
pub fn paginate<T>(entries: &[T], per_page: usize, page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total = entries.len().div_ceil(per_page).max(1);
    let number = page.clamp(1, total);
    let start = (number - 1) * per_page;
    let end = (start + per_page).min(entries.len());

    Page {
        items: &entries[start.min(entries.len())..end],
        number,
        total,
    }
}
