use anyhow::{anyhow, Context, Result};
use std::env;
use std::time::Duration;

pub const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";
pub const TELEGRAM_BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Process-wide settings, read once at startup and passed down explicitly.
#[derive(Clone)]
pub struct AppConfig {
    google_api_key: Option<String>,
    telegram_bot_token: Option<String>,
    pub model: String,
    pub api_base: String,
    pub fetch_timeout: Duration,
    pub llm_timeout: Duration,
}

impl AppConfig {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            google_api_key: lookup(GOOGLE_API_KEY_VAR).filter(|k| valid_api_key(k)),
            telegram_bot_token: lookup(TELEGRAM_BOT_TOKEN_VAR).filter(|k| valid_api_key(k)),
            model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: lookup("GEMINI_API_BASE")
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            fetch_timeout: seconds(&lookup, "NEWSCHECK_FETCH_TIMEOUT_SECS", 30)?,
            llm_timeout: seconds(&lookup, "NEWSCHECK_LLM_TIMEOUT_SECS", 120)?,
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn google_api_key(&self) -> Result<&str> {
        self.google_api_key
            .as_deref()
            .ok_or_else(|| anyhow!("{} is not set", GOOGLE_API_KEY_VAR))
    }

    pub fn telegram_bot_token(&self) -> Result<&str> {
        self.telegram_bot_token
            .as_deref()
            .ok_or_else(|| anyhow!("{} is not set", TELEGRAM_BOT_TOKEN_VAR))
    }
}

/// Rejects blanks and copy-pasted placeholders such as `sk-...`.
pub fn valid_api_key(key: &str) -> bool {
    let trimmed = key.trim();
    !trimmed.is_empty() && !trimmed.contains("...")
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<Duration> {
    match lookup(key) {
        Some(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds, got {:?}", key, raw))?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(Duration::from_secs(default)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.model, DEFAULT_MODEL);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(30));
        assert_eq!(cfg.llm_timeout, Duration::from_secs(120));
        let err = cfg.google_api_key().unwrap_err();
        assert!(err.to_string().contains("GOOGLE_API_KEY"));
        assert!(cfg.telegram_bot_token().is_err());
    }

    #[test]
    fn credentials_and_overrides() {
        let cfg = config(&[
            ("GOOGLE_API_KEY", "abc123"),
            ("TELEGRAM_BOT_TOKEN", "12:xyz"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("NEWSCHECK_FETCH_TIMEOUT_SECS", " 5 "),
        ])
        .unwrap();
        assert_eq!(cfg.google_api_key().unwrap(), "abc123");
        assert_eq!(cfg.telegram_bot_token().unwrap(), "12:xyz");
        assert_eq!(cfg.model, "gemini-2.5-pro");
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(5));
    }

    #[test]
    fn placeholder_keys_count_as_missing() {
        let cfg = config(&[("GOOGLE_API_KEY", "AIza..."), ("TELEGRAM_BOT_TOKEN", "  ")]).unwrap();
        assert!(cfg.google_api_key().is_err());
        assert!(cfg.telegram_bot_token().is_err());
    }

    #[test]
    fn bad_timeout_is_an_error() {
        assert!(config(&[("NEWSCHECK_LLM_TIMEOUT_SECS", "soon")]).is_err());
    }
}
