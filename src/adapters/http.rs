use crate::adapters::gemini::GeminiClient;
use crate::config::ServerConfig;
use crate::core::analysis::AnalysisService;
use crate::domain::model::AnalysisRequest;
use crate::domain::ports::TextGenerator;
use crate::utils::error::{CoachError, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

const SERVICE_NAME: &str = "dialect-coach";

/// Shared, read-only handler state. `analyzer` is `None` when the backend
/// could not be configured at startup.
#[derive(Clone, Default)]
pub struct AppState {
    analyzer: Option<AnalysisService>,
}

impl AppState {
    pub fn new(analyzer: Option<AnalysisService>) -> Self {
        Self { analyzer }
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>, validate_output: bool) -> Self {
        Self::new(Some(
            AnalysisService::new(generator).with_output_validation(validate_output),
        ))
    }

    /// Builds the Gemini client once. Failures are logged and leave the
    /// service running without a backend.
    pub fn from_config(config: &ServerConfig) -> Self {
        let Some(settings) = config.backend_settings() else {
            tracing::warn!("GEMINI_API_KEY is not set; analysis requests will be refused");
            return Self::default();
        };

        match GeminiClient::new(settings) {
            Ok(client) => {
                tracing::info!("Gemini backend configured (model: {})", client.model());
                Self::with_generator(Arc::new(client), config.validate_output)
            }
            Err(e) => {
                tracing::error!("Failed to configure Gemini backend: {}", e);
                Self::default()
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.analyzer.is_some()
    }
}

pub fn build_router(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/healthz", get(health))
        .route("/analisar", post(analyze_text))
        .with_state(state);

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct Health {
    ok: bool,
    service: &'static str,
    backend_configured: bool,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        ok: true,
        service: SERVICE_NAME,
        backend_configured: state.is_configured(),
    })
}

/// Submit text for dialect analysis.
async fn analyze_text(State(state): State<AppState>, body: Bytes) -> Result<Json<String>> {
    let analyzer = state
        .analyzer
        .as_ref()
        .ok_or(CoachError::BackendNotConfigured)?;
    let request = AnalysisRequest::from_json(&body)?;
    let reply = analyzer.analyze(&request).await?;
    Ok(Json(reply))
}

#[derive(Serialize)]
struct ErrorBody {
    erro: &'static str,
}

impl IntoResponse for CoachError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            CoachError::MissingText => tracing::info!("Rejected request: {}", self),
            CoachError::BackendNotConfigured => tracing::warn!("Rejected request: {}", self),
            _ => tracing::error!("Analysis failed: {}", self),
        }
        (
            status,
            Json(ErrorBody {
                erro: self.public_message(),
            }),
        )
            .into_response()
    }
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            CoachError::MissingText.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoachError::EmptyCompletion.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_state_without_key_is_unconfigured() {
        let config = crate::config::parse_args_only(&["--api-key", ""]);
        assert!(!AppState::from_config(&config).is_configured());
    }

    #[test]
    fn test_state_with_key_is_configured() {
        let config = crate::config::parse_args_only(&["--api-key", "k"]);
        assert!(AppState::from_config(&config).is_configured());
    }

    #[test]
    fn test_state_with_unusable_key_runs_unconfigured() {
        let config = crate::config::parse_args_only(&["--api-key", "bad\u{7f}key"]);
        assert!(config.api_key().is_some());
        assert!(!AppState::from_config(&config).is_configured());
    }
}
