use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// One answered question as submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct QuestionItem {
    #[validate(length(min = 1, message = "question_id cannot be empty"))]
    pub question_id: String,
    #[validate(length(min = 1, message = "question cannot be empty"))]
    pub question: String,
    pub actual_answer: String,
    pub expected_answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreDetail {
    pub question_id: String,
    pub question: String,
    pub score: f64,
    pub correct: bool,
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SwotResult {
    pub strengths: String,
    pub weaknesses: String,
    pub opportunities: String,
    pub threats: String,
}
