mod extract;
mod format;
mod llm_client;
mod pipeline;
mod prompt;
mod response;
mod validator;

pub use extract::{extract_json_from_text, extract_verdict};
pub use format::format_verdict;
pub use llm_client::{AnalysisClient, GeminiClient, MockAnalysisClient};
pub use pipeline::{
    CheckOutcome, FactCheckPipeline, ANALYSIS_FAILED_MESSAGE, ANALYSIS_HEADER,
    PROCESSING_ERROR_MESSAGE,
};
pub use prompt::PromptTemplate;
pub use response::{GenerateContentRequest, GenerateContentResponse};
pub use validator::{has_http_scheme, is_valid_source_link, repair_sources};
