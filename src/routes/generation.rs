use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::generation_dto::{
        AlternativesRequest, QuestionGenerationRequest, QuestionGenerationResponse,
    },
    error::Result,
    models::question::AlternativeQuestion,
    routes::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/generate-qa",
    request_body = QuestionGenerationRequest,
    responses(
        (status = 200, description = "Generated test questions", body = QuestionGenerationResponse),
        (status = 422, description = "Invalid request payload"),
        (status = 500, description = "Model call failed or returned unusable output")
    )
)]
#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<QuestionGenerationRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let generated = state.assessment_service.generate_questions(&payload).await?;
    Ok(Json(generated))
}

#[utoipa::path(
    post,
    path = "/generate-alternatives",
    request_body = AlternativesRequest,
    responses(
        (status = 200, description = "Exactly three alternative questions", body = [AlternativeQuestion]),
        (status = 422, description = "Invalid request payload"),
        (status = 500, description = "Model call failed or returned unusable output")
    )
)]
#[axum::debug_handler]
pub async fn generate_alternatives(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<AlternativesRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let alternatives = state
        .assessment_service
        .generate_alternatives(&payload)
        .await?;
    Ok(Json(alternatives))
}
