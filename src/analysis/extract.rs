use super::validator::repair_sources;
use crate::domain::VerdictRecord;
use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::debug;

/// Parses the whole text as JSON, then falls back to the span between the
/// first `{` and the last `}`.
pub fn extract_json_from_text(s: &str) -> Result<Value> {
    if let Ok(v) = serde_json::from_str::<Value>(s) {
        return Ok(v);
    }

    if let (Some(i), Some(j)) = (s.find('{'), s.rfind('}')) {
        if i < j {
            let slice = &s[i..=j];
            if let Ok(v) = serde_json::from_str::<Value>(slice) {
                return Ok(v);
            }
        }
    }

    Err(anyhow!("no valid JSON found in model output"))
}

/// Recovers a verdict from a raw model response and repairs its source links
/// using `user_text` as search context. Never fails: anything unusable is `None`.
pub fn extract_verdict(raw: &str, user_text: Option<&str>) -> Option<VerdictRecord> {
    let value = match extract_json_from_text(raw) {
        Ok(value) => value,
        Err(err) => {
            debug!(error = %err, len = raw.len(), "model output is not JSON");
            return None;
        }
    };
    let mut record = VerdictRecord::from_value(&value)?;
    repair_sources(&mut record, user_text.unwrap_or(""));
    Some(record)
}
