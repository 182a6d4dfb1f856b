use crate::core::prompt::build_prompt;
use crate::domain::model::{AnalysisRequest, AnalysisResult};
use crate::domain::ports::TextGenerator;
use crate::utils::error::Result;
use std::sync::Arc;

/// Runs one analysis: prompt, backend call, fence cleanup.
#[derive(Clone)]
pub struct AnalysisService {
    generator: Arc<dyn TextGenerator>,
    validate_output: bool,
}

impl AnalysisService {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            validate_output: false,
        }
    }

    /// When enabled, replies that do not parse as an [`AnalysisResult`] are errors.
    pub fn with_output_validation(mut self, enabled: bool) -> Self {
        self.validate_output = enabled;
        self
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        let prompt = build_prompt(&request.text, request.dialect.code());
        tracing::debug!(
            dialect = request.dialect.code(),
            "Sending prompt ({} chars) to generation backend",
            prompt.len()
        );

        let raw = self.generator.generate(&prompt).await?;
        tracing::debug!("Backend reply: {}", raw);

        let cleaned = strip_code_fences(&raw);
        if self.validate_output {
            let result = AnalysisResult::parse(&cleaned)?;
            tracing::debug!("Reply validated (score {})", result.score);
        }

        Ok(cleaned)
    }
}

/// Removes every ```` ```json ```` and ```` ``` ```` marker and trims the result.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
