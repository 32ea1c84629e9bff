pub const SEARCH_URL_PREFIX: &str = "https://www.google.com/search?q=";

/// Search link for `title` plus some context words. Spaces become `+`; nothing
/// else is escaped.
pub fn google_search_url(title: &str, context: &str) -> String {
    let query = format!("{} {}", title, context);
    format!("{}{}", SEARCH_URL_PREFIX, query.trim().replace(' ', "+"))
}

pub fn take_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
