use axum::Json;
use utoipa::OpenApi;

use crate::dto::assessment_dto::{ScoreResponse, Submission};
use crate::dto::generation_dto::{
    AlternativesRequest, QuestionGenerationRequest, QuestionGenerationResponse,
};
use crate::models::assessment::{QuestionItem, ScoreDetail, SwotResult};
use crate::models::question::{AlternativeQuestion, GeneratedQuestion, QuestionType};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assignment Evaluation API",
        description = "Evaluate student assignments, produce SWOT analyses and generate questions with an LLM"
    ),
    paths(
        crate::routes::assessment::evaluate,
        crate::routes::assessment::swot_analysis,
        crate::routes::generation::generate_questions,
        crate::routes::generation::generate_alternatives,
        crate::routes::health::health_check,
    ),
    components(schemas(
        Submission,
        QuestionItem,
        ScoreDetail,
        ScoreResponse,
        SwotResult,
        QuestionGenerationRequest,
        QuestionGenerationResponse,
        GeneratedQuestion,
        AlternativesRequest,
        AlternativeQuestion,
        QuestionType,
    ))
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
