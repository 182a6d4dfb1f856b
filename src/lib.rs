pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::gemini::GeminiClient;
pub use crate::adapters::http::{build_router, AppState};
pub use crate::config::{BackendSettings, ServerConfig};
pub use crate::core::{analysis::AnalysisService, prompt::build_prompt};
pub use crate::domain::model::{AnalysisRequest, AnalysisResult, Dialect};
pub use crate::domain::ports::TextGenerator;
pub use crate::utils::error::{CoachError, Result};
