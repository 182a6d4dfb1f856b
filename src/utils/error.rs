use axum::http::StatusCode;
use thiserror::Error;

pub const BACKEND_NOT_CONFIGURED_MESSAGE: &str = "API do Gemini não configurada";
pub const MISSING_TEXT_MESSAGE: &str = "Nenhum texto fornecido";
pub const PROCESSING_ERROR_MESSAGE: &str = "Erro ao processar a solicitação";

#[derive(Error, Debug)]
pub enum CoachError {
    #[error("Generation backend is not configured")]
    BackendNotConfigured,

    #[error("Request did not contain any text")]
    MissingText,

    #[error("Request body is not a JSON object")]
    InvalidBody,

    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Generation backend error: {message}")]
    BackendError { message: String },

    #[error("Generation backend returned no text")]
    EmptyCompletion,

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl CoachError {
    /// HTTP status this error is reported with when it reaches a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoachError::MissingText => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to a caller. Backend detail never leaves the process.
    pub fn public_message(&self) -> &'static str {
        match self {
            CoachError::BackendNotConfigured => BACKEND_NOT_CONFIGURED_MESSAGE,
            CoachError::MissingText => MISSING_TEXT_MESSAGE,
            _ => PROCESSING_ERROR_MESSAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoachError>;
