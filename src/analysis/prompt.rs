use serde::{Deserialize, Serialize};

const FACT_CHECK_INSTRUCTION: &str = concat!(
    "You are a Fake NEWS Detector. You will be given a news article or claim, ",
    "and you need to determine if it is real or fake.\n",
    "Provide a JSON with: \"verdict\" (\"Real\", \"Fake\" or \"Uncertain\"), ",
    "\"confidence\" (float 0-1), \"reason\" (proper valid reason for the verdict), ",
    "\"sources\" (object with titles).\n",
    "example: {\"verdict\": \"Fake\", \"confidence\": 0.85, ",
    "\"reason\": \"The article contains misleading information.\", ",
    "\"sources\": {\"title1\": \"source1\", \"title2\": \"source2\"}}\n",
    "NOTE: Reverify the verdict before returning the response.\n",
    "In sources the title should be the title of the source and the link should be the link to the source.\n",
    "NOTE: IF HALF THE MESSAGE IS REAL AND HALF THE MESSAGE IS NOT THE RETURN CONFIDENCE AS 0.5 ",
    "AND VERDICT AS UNCERTAIN\n",
);

/// Request configuration sent with every analysis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub web_search: bool,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            system: FACT_CHECK_INSTRUCTION.to_string(),
            web_search: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_instruction_names_the_fields() {
        let template = PromptTemplate::default();
        assert!(template.web_search);
        for field in ["\"verdict\"", "\"confidence\"", "\"reason\"", "\"sources\""] {
            assert!(template.system.contains(field), "missing {field}");
        }
        assert!(template.system.contains("UNCERTAIN"));
    }
}
