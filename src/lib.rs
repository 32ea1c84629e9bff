pub mod analysis;
pub mod chat;
pub mod config;
pub mod domain;
pub mod input;
pub mod utils;

pub use analysis::{
    extract_verdict, format_verdict, AnalysisClient, FactCheckPipeline, GeminiClient,
    MockAnalysisClient, PromptTemplate,
};
pub use config::AppConfig;
pub use domain::{Confidence, NewsInput, SourceLink, Verdict, VerdictRecord};
pub use input::{InputAssembler, InputAssemblerConfig};
