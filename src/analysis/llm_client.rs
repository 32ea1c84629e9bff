use super::prompt::PromptTemplate;
use super::response::{GenerateContentRequest, GenerateContentResponse};
use crate::domain::NewsInput;
use anyhow::{anyhow, Context, Result};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// The generative-AI boundary: one payload in, raw response text out.
pub trait AnalysisClient: Send + Sync {
    fn analyze(&self, input: &NewsInput) -> Result<String>;
}

pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    prompt: PromptTemplate,
    http: HttpClient,
}

impl GeminiClient {
    pub fn new(
        api_base: &str,
        model: &str,
        api_key: impl Into<String>,
        prompt: PromptTemplate,
        timeout: Duration,
    ) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client for Gemini")?;

        Ok(Self {
            endpoint: generate_content_url(api_base, model),
            api_key: api_key.into(),
            prompt,
            http,
        })
    }
}

fn generate_content_url(api_base: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        api_base.trim_end_matches('/'),
        model
    )
}

impl AnalysisClient for GeminiClient {
    fn analyze(&self, input: &NewsInput) -> Result<String> {
        let payload = GenerateContentRequest::new(&self.prompt, input);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&payload)
            .send()
            .context("HTTP call to Gemini failed")?
            .error_for_status()
            .context("Gemini returned an error status")?;

        let raw: GenerateContentResponse = response
            .json()
            .context("unreadable Gemini response")?;

        raw.text()
            .ok_or_else(|| anyhow!("Gemini response contained no text"))
    }
}

/// Canned responses for tests, served in push order. Records every payload it sees.
#[derive(Clone, Default)]
pub struct MockAnalysisClient {
    responses: Arc<Mutex<VecDeque<std::result::Result<String, String>>>>,
    received: Arc<Mutex<Vec<NewsInput>>>,
}

impl MockAnalysisClient {
    pub fn push_response(&self, raw: impl Into<String>) {
        self.responses.lock().push_back(Ok(raw.into()));
    }

    pub fn push_failure(&self, message: impl Into<String>) {
        self.responses.lock().push_back(Err(message.into()));
    }

    pub fn received(&self) -> Vec<NewsInput> {
        self.received.lock().clone()
    }
}

impl AnalysisClient for MockAnalysisClient {
    fn analyze(&self, input: &NewsInput) -> Result<String> {
        self.received.lock().push(input.clone());
        match self.responses.lock().pop_front() {
            Some(Ok(raw)) => Ok(raw),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no mock response available")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_base_and_model() {
        assert_eq!(
            generate_content_url("https://generativelanguage.googleapis.com/v1beta/", "gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn mock_serves_in_order_and_records_inputs() {
        let mock = MockAnalysisClient::default();
        mock.push_response("first");
        mock.push_failure("boom");

        assert_eq!(mock.analyze(&NewsInput::from_text("a")).unwrap(), "first");
        let err = mock.analyze(&NewsInput::from_text("b")).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(mock.analyze(&NewsInput::from_text("c")).is_err());

        let texts: Vec<String> = mock.received().iter().map(|i| i.text().to_string()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }
}
