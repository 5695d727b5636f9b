use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::assessment_dto::{ScoreResponse, Submission},
    error::Result,
    models::assessment::SwotResult,
    routes::extract::JsonBody,
    AppState,
};

#[utoipa::path(
    post,
    path = "/evaluate",
    request_body = Submission,
    responses(
        (status = 200, description = "Per-question scores and feedback", body = ScoreResponse),
        (status = 422, description = "Invalid submission"),
        (status = 500, description = "Model call failed or returned unusable output")
    )
)]
#[axum::debug_handler]
pub async fn evaluate(
    State(state): State<AppState>,
    JsonBody(submission): JsonBody<Submission>,
) -> Result<impl IntoResponse> {
    submission.validate()?;
    let scores = state.assessment_service.evaluate(&submission).await?;
    Ok(Json(scores))
}

#[utoipa::path(
    post,
    path = "/swot",
    request_body = Submission,
    responses(
        (status = 200, description = "Overall SWOT analysis", body = SwotResult),
        (status = 422, description = "Invalid submission"),
        (status = 500, description = "Model call failed or returned unusable output")
    )
)]
#[axum::debug_handler]
pub async fn swot_analysis(
    State(state): State<AppState>,
    JsonBody(submission): JsonBody<Submission>,
) -> Result<impl IntoResponse> {
    submission.validate()?;
    let swot = state.assessment_service.swot(&submission).await?;
    Ok(Json(swot))
}
