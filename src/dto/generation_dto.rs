use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::models::question::{GeneratedQuestion, QuestionType};

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "passing_score_within_max"))]
pub struct QuestionGenerationRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub subject: String,
    #[serde(rename = "class")]
    #[validate(length(min = 1))]
    pub class_: String,
    pub start_date: String,
    pub end_date: String,
    #[validate(length(min = 1))]
    pub question_type: String,
    #[validate(range(min = 1, message = "At least one question must be requested"))]
    pub number_of_questions: u32,
    #[validate(length(min = 1))]
    pub difficulty: String,
    #[validate(length(min = 1))]
    pub topics: String,
    pub instructions: String,
    pub description: String,
    pub max_score: u32,
    pub passing_score: u32,
}

fn passing_score_within_max(req: &QuestionGenerationRequest) -> Result<(), ValidationError> {
    if req.passing_score > req.max_score {
        let mut err = ValidationError::new("passing_score");
        err.message = Some("passing_score cannot exceed max_score".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionGenerationResponse {
    pub test_title: String,
    pub subject: String,
    #[serde(rename = "class")]
    pub class_: String,
    pub questions: Vec<GeneratedQuestion>,
}

/// The question an alternative set is requested for.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AlternativesRequest {
    pub id: String,
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub subtopic: String,
    #[validate(length(min = 1))]
    pub difficulty: String,
    #[validate(range(min = 0.0))]
    pub marks: f64,
    #[serde(rename = "questionType")]
    pub question_type: QuestionType,
    #[validate(length(min = 1))]
    pub subject: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generation_body() -> serde_json::Value {
        json!({
            "title": "Unit test 3",
            "subject": "Physics",
            "class": "Grade 9",
            "start_date": "2026-01-10",
            "end_date": "2026-01-12",
            "question_type": "short answer",
            "number_of_questions": 5,
            "difficulty": "medium",
            "topics": "Newton's laws",
            "instructions": "Avoid numericals",
            "description": "Mid-term revision",
            "max_score": 50,
            "passing_score": 20
        })
    }

    #[test]
    fn class_field_uses_the_wire_name() {
        let req: QuestionGenerationRequest = serde_json::from_value(generation_body()).unwrap();
        assert_eq!(req.class_, "Grade 9");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn passing_score_above_max_fails_validation() {
        let mut body = generation_body();
        body["passing_score"] = json!(60);
        let req: QuestionGenerationRequest = serde_json::from_value(body).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_questions_fails_validation() {
        let mut body = generation_body();
        body["number_of_questions"] = json!(0);
        let req: QuestionGenerationRequest = serde_json::from_value(body).unwrap();
        let errs = req.validate().unwrap_err();
        assert!(errs.field_errors().contains_key("number_of_questions"));
    }

    #[test]
    fn alternatives_request_reads_camel_case_type() {
        let req: AlternativesRequest = serde_json::from_value(json!({
            "id": "q-17",
            "title": "Define inertia",
            "description": "Explain inertia with an example",
            "subtopic": "First law",
            "difficulty": "easy",
            "marks": 2,
            "questionType": "SHORT_ANSWER",
            "subject": "Physics"
        }))
        .unwrap();
        assert_eq!(req.question_type, QuestionType::ShortAnswer);
        assert!(req.validate().is_ok());
    }

    #[test]
    fn unknown_question_type_is_rejected() {
        let res = serde_json::from_value::<AlternativesRequest>(json!({
            "id": "q-17",
            "title": "t",
            "description": "d",
            "subtopic": "s",
            "difficulty": "easy",
            "marks": 2,
            "questionType": "ESSAY",
            "subject": "Physics"
        }));
        assert!(res.is_err());
    }
}
