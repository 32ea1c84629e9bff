mod search;

pub use search::{google_search_url, take_chars, SEARCH_URL_PREFIX};
