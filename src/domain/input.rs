pub const IMAGE_MIME_TYPE: &str = "image/jpeg";
/// Text sent alongside an image when the user wrote nothing.
pub const IMAGE_PLACEHOLDER_TEXT: &str = "news image";
/// Text sent when there is neither an image nor any user text.
pub const EMPTY_INPUT_TEXT: &str = "No input provided.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePart {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImagePart {
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            mime_type: IMAGE_MIME_TYPE.to_string(),
            data,
        }
    }
}

/// Payload handed to the analysis service. Built per request and consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsInput {
    Text(String),
    ImageWithText { image: ImagePart, text: String },
}

impl NewsInput {
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            NewsInput::Text(EMPTY_INPUT_TEXT.to_string())
        } else {
            NewsInput::Text(trimmed.to_string())
        }
    }

    pub fn with_image(image: ImagePart, text: &str) -> Self {
        let trimmed = text.trim();
        let text = if trimmed.is_empty() {
            IMAGE_PLACEHOLDER_TEXT
        } else {
            trimmed
        };
        NewsInput::ImageWithText {
            image,
            text: text.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            NewsInput::Text(text) => text,
            NewsInput::ImageWithText { text, .. } => text,
        }
    }

    pub fn image(&self) -> Option<&ImagePart> {
        match self {
            NewsInput::Text(_) => None,
            NewsInput::ImageWithText { image, .. } => Some(image),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_or_replaced() {
        assert_eq!(NewsInput::from_text("  claim \n"), NewsInput::Text("claim".into()));
        assert_eq!(NewsInput::from_text("   "), NewsInput::Text(EMPTY_INPUT_TEXT.into()));
    }

    #[test]
    fn image_gets_placeholder_text() {
        let input = NewsInput::with_image(ImagePart::jpeg(vec![1, 2, 3]), "");
        assert_eq!(input.text(), IMAGE_PLACEHOLDER_TEXT);
        let image = input.image().unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, vec![1, 2, 3]);

        let input = NewsInput::with_image(ImagePart::jpeg(vec![9]), " headline ");
        assert_eq!(input.text(), "headline");
    }
}
