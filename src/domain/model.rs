use crate::utils::error::{CoachError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Target English variant for a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    American,
    British,
}

impl Dialect {
    /// Parses a BCP 47 code. Anything other than `en-GB` falls back to American.
    pub fn from_code(code: &str) -> Self {
        match code {
            "en-GB" => Dialect::British,
            _ => Dialect::American,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Dialect::American => "en-US",
            Dialect::British => "en-GB",
        }
    }
}

/// A validated request to analyse a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub text: String,
    pub dialect: Dialect,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>, dialect: Dialect) -> Self {
        Self {
            text: text.into(),
            dialect,
        }
    }

    /// Reads `{"texto": ..., "dialeto": ...}` from a raw request body.
    ///
    /// An object without a non-empty string `texto` is [`CoachError::MissingText`].
    /// A body that is not a JSON object at all is a processing failure.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let payload: Value = serde_json::from_slice(body)?;
        let fields = payload.as_object().ok_or(CoachError::InvalidBody)?;

        let text = fields
            .get("texto")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .ok_or(CoachError::MissingText)?;

        let dialect = fields
            .get("dialeto")
            .and_then(Value::as_str)
            .map(Dialect::from_code)
            .unwrap_or_default();

        Ok(Self::new(text, dialect))
    }
}

/// The object the model is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub score: i64,
    pub corrected: String,
    pub explanation: String,
}

impl AnalysisResult {
    pub fn parse(raw: &str) -> Result<Self> {
        let result: AnalysisResult = serde_json::from_str(raw)?;
        result.validate()?;
        Ok(result)
    }
}

impl Validate for AnalysisResult {
    fn validate(&self) -> Result<()> {
        validate_range("score", self.score, 0, 100)
    }
}
