pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::services::{
    assessment_service::AssessmentService,
    llm_service::{GeminiClient, LanguageModel},
};

const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub assessment_service: AssessmentService,
}

impl AppState {
    pub fn new(config: &Config) -> error::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        let gemini = GeminiClient::from_config(config, http_client);
        tracing::info!(model = %gemini.model(), "using Gemini model");

        Ok(Self::with_model(
            Arc::new(gemini),
            config.max_generated_questions,
        ))
    }

    pub fn with_model(llm: Arc<dyn LanguageModel>, max_generated_questions: u32) -> Self {
        Self {
            assessment_service: AssessmentService::new(llm, max_generated_questions),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health-check", get(routes::health::health_check))
        .route("/openapi.json", get(routes::docs::openapi_json))
        .route("/evaluate", post(routes::assessment::evaluate))
        .route("/swot", post(routes::assessment::swot_analysis))
        .route("/generate-qa", post(routes::generation::generate_questions))
        .route(
            "/generate-alternatives",
            post(routes::generation::generate_alternatives),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}
