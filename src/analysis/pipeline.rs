use super::extract::extract_verdict;
use super::format::format_verdict;
use super::llm_client::AnalysisClient;
use crate::domain::VerdictRecord;
use crate::input::InputAssembler;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const ANALYSIS_HEADER: &str = "Analysis Result:\n\n";
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Sorry, I couldn't analyze that at the moment. Please try again.";
pub const PROCESSING_ERROR_MESSAGE: &str =
    "An error occurred while processing your request. Please try again later.";

#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub request_id: Uuid,
    pub raw_response: String,
    pub record: Option<VerdictRecord>,
}

impl CheckOutcome {
    /// The record, unless extraction failed or produced nothing usable.
    pub fn usable_record(&self) -> Option<&VerdictRecord> {
        self.record.as_ref().filter(|record| !record.is_empty())
    }
}

/// Input assembly, the service call and verdict extraction for one request.
/// Holds no per-request state, so one instance serves every chat.
pub struct FactCheckPipeline<C: AnalysisClient> {
    llm: Arc<C>,
    assembler: InputAssembler,
}

impl<C: AnalysisClient> FactCheckPipeline<C> {
    pub fn new(llm: Arc<C>, assembler: InputAssembler) -> Self {
        Self { llm, assembler }
    }

    pub fn check(&self, text: &str, image_source: Option<&str>) -> Result<CheckOutcome> {
        let request_id = Uuid::new_v4();
        info!(%request_id, chars = text.chars().count(), has_image = image_source.is_some(), "analysis requested");

        let input = self.assembler.assemble(text, image_source);
        let raw_response = self
            .llm
            .analyze(&input)
            .with_context(|| format!("analysis call failed for request {}", request_id))?;

        let record = extract_verdict(&raw_response, Some(text.trim()));
        match &record {
            Some(record) => info!(
                %request_id,
                verdict = ?record.verdict,
                sources = record.sources.len(),
                "analysis completed"
            ),
            None => warn!(%request_id, "no verdict could be extracted from the model output"),
        }

        Ok(CheckOutcome {
            request_id,
            raw_response,
            record,
        })
    }

    /// Runs a check and renders the reply for the user. Never fails.
    pub fn reply_for(&self, text: &str, image_source: Option<&str>) -> String {
        match self.check(text, image_source) {
            Ok(outcome) => match outcome.usable_record() {
                Some(record) => format!("{}{}", ANALYSIS_HEADER, format_verdict(record)),
                None => ANALYSIS_FAILED_MESSAGE.to_string(),
            },
            Err(err) => {
                error!(error = %format!("{err:#}"), "error processing message");
                PROCESSING_ERROR_MESSAGE.to_string()
            }
        }
    }
}
