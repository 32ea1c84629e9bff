use crate::domain::VerdictRecord;
use crate::utils::{google_search_url, take_chars};
use tracing::debug;

pub const MIN_SOURCE_LINK_LEN: usize = 5;
/// How much of the user's text goes into a synthesized search query.
pub const QUERY_CONTEXT_CHARS: usize = 50;

pub fn has_http_scheme(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}

pub fn is_valid_source_link(link: &str) -> bool {
    let numeric = !link.is_empty() && link.chars().all(char::is_numeric);
    has_http_scheme(link) && !numeric && link.chars().count() >= MIN_SOURCE_LINK_LEN
}

/// Replaces untrustworthy links with a search query built from the title and
/// the start of the user's text. Order and titles are untouched. Returns how
/// many links were rewritten.
pub fn repair_sources(record: &mut VerdictRecord, user_text: &str) -> usize {
    let context = take_chars(user_text, QUERY_CONTEXT_CHARS);
    let mut repaired = 0;
    for source in record.sources.iter_mut() {
        if is_valid_source_link(&source.link) {
            continue;
        }
        let replacement = google_search_url(&source.title, context);
        debug!(title = %source.title, original = %source.link, "source link replaced by search query");
        source.link = replacement;
        repaired += 1;
    }
    repaired
}
