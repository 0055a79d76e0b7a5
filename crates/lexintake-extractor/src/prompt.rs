//! Instruction template posted to the assistant for each file
//!
//! The template is data, not logic: it names the file to retrieve and lists
//! the tags the reply must use. Parsing of the reply lives in `parser`.

/// The standard contract field set requested from the assistant, in the
/// order the columns should appear.
pub const DEFAULT_CONTRACT_FIELDS: &[&str] = &[
    "contractTitle",
    "contractType",
    "contractRole",
    "contractID",
    "budgetCode",
    "effectiveDate",
    "expirationDate",
    "renewalDate",
    "jurisdiction",
    "contractValue",
    "contractStatus",
];

const FORMAT_RULES: &str = "Provide the extracted information in the following XML format \
without any additional text or markup. If information is not available, respond with 'N/A' \
inside the corresponding tag.\n\
Respond only using the following example. Do not include any markup or source citations:";

/// Builds the single user message driving one extraction run
pub struct PromptBuilder {
    filename: String,
    fields: Vec<String>,
}

impl PromptBuilder {
    /// Create a builder for the given file, requesting the standard
    /// contract field set
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            fields: DEFAULT_CONTRACT_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Replace the requested field list
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields;
        self
    }

    /// Build the complete instruction message
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Retrieval directive naming the file
        prompt.push_str(&format!("Use file retrieval for file: {}\n", self.filename));

        // 2. Extraction instruction
        prompt.push_str(&format!(
            "Extract content from the file: {}\n",
            self.filename
        ));
        prompt.push_str(FORMAT_RULES);
        prompt.push('\n');

        // 3. One empty tag pair per requested field
        for field in &self.fields {
            prompt.push_str(&format!("<{field}></{field}>\n"));
        }

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_the_file() {
        let prompt = PromptBuilder::new("20231220 Continental Swift MSA Signed.pdf").build();
        assert!(prompt.contains("Use file retrieval for file: 20231220 Continental Swift MSA Signed.pdf"));
        assert!(prompt.contains("Extract content from the file: 20231220 Continental Swift MSA Signed.pdf"));
    }

    #[test]
    fn test_prompt_lists_every_default_field_as_tag_pair() {
        let prompt = PromptBuilder::new("a.pdf").build();
        for field in DEFAULT_CONTRACT_FIELDS {
            assert!(prompt.contains(&format!("<{field}></{field}>")), "missing {field}");
        }
    }

    #[test]
    fn test_prompt_with_custom_fields() {
        let prompt = PromptBuilder::new("a.pdf")
            .with_fields(vec!["parties".to_string(), "term".to_string()])
            .build();
        assert!(prompt.contains("<parties></parties>"));
        assert!(prompt.contains("<term></term>"));
        assert!(!prompt.contains("<contractTitle>"));
    }

    #[test]
    fn test_prompt_includes_format_rules() {
        let prompt = PromptBuilder::new("a.pdf").build();
        assert!(prompt.contains("without any additional text or markup"));
        assert!(prompt.contains("respond with 'N/A'"));
    }
}
