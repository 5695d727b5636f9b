use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::assessment::{QuestionItem, ScoreDetail};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct Submission {
    #[validate(
        length(min = 1, message = "Submission must contain at least one item"),
        nested
    )]
    pub items: Vec<QuestionItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub total_score: f64,
    pub details: Vec<ScoreDetail>,
}

impl ScoreResponse {
    pub fn from_details(details: Vec<ScoreDetail>) -> Self {
        let total_score = details.iter().map(|d| d.score).sum();
        Self {
            total_score,
            details,
        }
    }
}
