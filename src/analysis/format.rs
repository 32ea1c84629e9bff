use super::validator::has_http_scheme;
use crate::domain::VerdictRecord;
use crate::utils::google_search_url;

/// Renders a record as the chat-ready block. Missing fields show their display
/// defaults; links without an http(s) scheme are swapped for a search link.
pub fn format_verdict(record: &VerdictRecord) -> String {
    let verdict = record
        .verdict
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "Unknown".to_string());
    let confidence = record
        .confidence
        .as_ref()
        .map(|c| c.percent_label())
        .unwrap_or_else(|| "0".to_string());
    let reason = record.reason.as_deref().unwrap_or("");

    let mut out = String::new();
    out.push_str(&format!("Verdict:  {} \n\n", verdict));
    out.push_str(&format!("Confidence: {}% \n\n", confidence));
    out.push_str(&format!("Reason: {} \n\n", reason));

    if !record.sources.is_empty() {
        out.push_str("Sources:\n");
        let context = record.input.as_deref().unwrap_or("");
        for source in &record.sources {
            let link = if has_http_scheme(&source.link) {
                source.link.clone()
            } else {
                google_search_url(&source.title, context)
            };
            out.push_str(&format!("- [{}]({})\n", source.title, link));
        }
    }
    out
}
