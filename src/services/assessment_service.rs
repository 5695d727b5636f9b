use std::sync::Arc;

use validator::{ValidationError, ValidationErrors};

use crate::dto::assessment_dto::{ScoreResponse, Submission};
use crate::dto::generation_dto::{
    AlternativesRequest, QuestionGenerationRequest, QuestionGenerationResponse,
};
use crate::error::{Error, Result};
use crate::models::assessment::SwotResult;
use crate::models::question::AlternativeQuestion;
use crate::services::llm_service::LanguageModel;
use crate::services::{normalizer, prompt_builder};

/// Build prompt, call the model once, normalize. No retries.
#[derive(Clone)]
pub struct AssessmentService {
    llm: Arc<dyn LanguageModel>,
    max_generated_questions: u32,
}

impl AssessmentService {
    pub fn new(llm: Arc<dyn LanguageModel>, max_generated_questions: u32) -> Self {
        Self {
            llm,
            max_generated_questions,
        }
    }

    pub async fn evaluate(&self, submission: &Submission) -> Result<ScoreResponse> {
        let prompt = prompt_builder::evaluation_prompt(&submission.items);
        let raw = self.llm.complete(&prompt).await?;
        let details = logged(
            "evaluate",
            &raw,
            normalizer::normalize_evaluation(&raw, &submission.items),
        )?;

        let response = ScoreResponse::from_details(details);
        tracing::info!(
            items = submission.items.len(),
            total_score = response.total_score,
            "submission evaluated"
        );
        Ok(response)
    }

    pub async fn swot(&self, submission: &Submission) -> Result<SwotResult> {
        let prompt = prompt_builder::swot_prompt(&submission.items);
        let raw = self.llm.complete(&prompt).await?;
        logged("swot", &raw, normalizer::normalize_swot(&raw))
    }

    pub async fn generate_questions(
        &self,
        req: &QuestionGenerationRequest,
    ) -> Result<QuestionGenerationResponse> {
        if req.number_of_questions > self.max_generated_questions {
            let mut err = ValidationError::new("range");
            err.message = Some(
                format!(
                    "number_of_questions cannot exceed {}",
                    self.max_generated_questions
                )
                .into(),
            );
            let mut errors = ValidationErrors::new();
            errors.add("number_of_questions", err);
            return Err(Error::Validation(errors));
        }

        let prompt = prompt_builder::question_generation_prompt(req);
        let raw = self.llm.complete(&prompt).await?;
        let questions = logged(
            "generate-qa",
            &raw,
            normalizer::normalize_generated_questions(&raw, req.number_of_questions as usize),
        )?;

        tracing::info!(
            title = %req.title,
            requested = req.number_of_questions,
            generated = questions.len(),
            "questions generated"
        );
        Ok(QuestionGenerationResponse {
            test_title: req.title.clone(),
            subject: req.subject.clone(),
            class_: req.class_.clone(),
            questions,
        })
    }

    pub async fn generate_alternatives(
        &self,
        req: &AlternativesRequest,
    ) -> Result<Vec<AlternativeQuestion>> {
        let prompt = prompt_builder::alternatives_prompt(req);
        let raw = self.llm.complete(&prompt).await?;
        let alternatives = logged(
            "generate-alternatives",
            &raw,
            normalizer::normalize_alternatives(&raw),
        )?;
        tracing::info!(id = %req.id, "alternatives generated");
        Ok(alternatives)
    }
}

fn logged<T>(operation: &str, raw: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!(operation, raw_len = raw.len(), error = %e, "model output rejected");
        tracing::debug!(operation, raw = %raw, "rejected model output");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::models::assessment::QuestionItem;

    struct CannedModel {
        reply: Result<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(Error::Upstream(e.to_string())),
            }
        }
    }

    fn submission() -> Submission {
        Submission {
            items: vec![
                QuestionItem {
                    question_id: "q1".into(),
                    question: "What is the capital of France?".into(),
                    actual_answer: "Paris".into(),
                    expected_answer: "Paris".into(),
                },
                QuestionItem {
                    question_id: "q2".into(),
                    question: "What is 2 + 2?".into(),
                    actual_answer: "5".into(),
                    expected_answer: "4".into(),
                },
            ],
        }
    }

    #[tokio::test]
    async fn evaluate_sums_scores() {
        let model = CannedModel::replying(
            r#"[{"score": 10, "correct": true, "feedback": "ok"}, {"score": 2.5, "correct": false}]"#,
        );
        let svc = AssessmentService::new(model.clone(), 50);
        let res = svc.evaluate(&submission()).await.unwrap();
        assert_eq!(res.total_score, 12.5);
        assert_eq!(res.details[1].question_id, "q2");
        assert_eq!(model.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_is_passed_through() {
        let model = Arc::new(CannedModel {
            reply: Err(Error::Upstream("quota".into())),
            prompts: Mutex::new(Vec::new()),
        });
        let svc = AssessmentService::new(model, 50);
        let err = svc.swot(&submission()).await.unwrap_err();
        assert_eq!(err.kind(), "upstream");
    }

    #[tokio::test]
    async fn question_cap_is_checked_before_calling_the_model() {
        let model = CannedModel::replying("{}");
        let svc = AssessmentService::new(model.clone(), 3);
        let req: QuestionGenerationRequest = serde_json::from_value(serde_json::json!({
            "title": "Quiz",
            "subject": "Maths",
            "class": "5",
            "start_date": "",
            "end_date": "",
            "question_type": "short answer",
            "number_of_questions": 4,
            "difficulty": "easy",
            "topics": "fractions",
            "instructions": "",
            "description": "",
            "max_score": 10,
            "passing_score": 5
        }))
        .unwrap();
        let err = svc.generate_questions(&req).await.unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(model.prompts.lock().unwrap().is_empty());
    }
}
