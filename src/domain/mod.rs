mod input;
mod verdict;

pub use input::{ImagePart, NewsInput, EMPTY_INPUT_TEXT, IMAGE_MIME_TYPE, IMAGE_PLACEHOLDER_TEXT};
pub use verdict::{Confidence, SourceLink, Verdict, VerdictRecord};
