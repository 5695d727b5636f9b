//! Prompt templates sent to the model, one per endpoint.
//!
//! Caller text is interpolated verbatim; the model contract (field names, JSON
//! shape) must stay in sync with `normalizer`.

use std::fmt::Write as _;

use crate::dto::generation_dto::{AlternativesRequest, QuestionGenerationRequest};
use crate::models::assessment::QuestionItem;
use crate::models::question::QuestionType;

const EVALUATION_INSTRUCTIONS: &str = r#"You are an experienced teacher with deep knowledge of the subject. Assess each of the student responses below.
For every response:
- Give a score from 0 to 10 for accuracy, completeness and clarity.
- Say whether the answer is correct (true) or incorrect (false).
- Write constructive, personal feedback: what was done well, what is missing or wrong, and one concrete next step. It should read like advice from a real teacher, not a template.

Return ONLY a JSON array with one object per response, in the same order as the responses, each with the fields:
- "question_id": the Question ID exactly as given
- "question": the question text
- "score": integer from 0 to 10
- "correct": boolean
- "feedback": string

"#;

const SWOT_INSTRUCTIONS: &str = r#"You are an education specialist experienced in student assessment and performance analysis.

Read the student's responses below together with the expected answers and write ONE overall SWOT analysis of the student's performance across the whole test, not per question.

- Strengths: where does the student show solid understanding or skill? Point out patterns with examples.
- Weaknesses: which recurring mistakes or gaps show up?
- Opportunities: what can the student do to improve? Suggest strategies, resources or habits.
- Threats: which misconceptions, habits or outside factors could hold the student back?

Address the student directly as "you" and keep the tone warm, specific and human.

Return ONLY a single JSON object with exactly these string fields:
"strengths", "weaknesses", "opportunities", "threats"

"#;

pub fn evaluation_prompt(items: &[QuestionItem]) -> String {
    let mut prompt = String::from(EVALUATION_INSTRUCTIONS);
    for (idx, item) in items.iter().enumerate() {
        let _ = write!(
            prompt,
            "{}. Question ID: {}\nQuestion: {}\nStudent Answer: {}\nExpected Answer: {}\n\n",
            idx + 1,
            item.question_id,
            item.question,
            item.actual_answer,
            item.expected_answer
        );
    }
    prompt
}

pub fn swot_prompt(items: &[QuestionItem]) -> String {
    let context = items
        .iter()
        .map(|item| {
            format!(
                "Question: {}\nStudent Answer: {}\nExpected Answer: {}\n",
                item.question, item.actual_answer, item.expected_answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}{}", SWOT_INSTRUCTIONS, context)
}

pub fn question_generation_prompt(req: &QuestionGenerationRequest) -> String {
    format!(
        r#"You are an experienced school teacher preparing a test titled "{title}".

Generate {count} **{question_type}** questions on **{topics}** for the subject **{subject}**, aimed at **{class}** students, at **{difficulty}** difficulty.
Test description: {description}
The test is worth {max_score} marks and the passing score is {passing_score}.

The questions must:
- be clear and appropriate for the students' age
- each cover a different concept
- follow these instructions: {instructions}

Give a clear expected answer for every question.

Return ONLY a JSON object in this format and nothing else:
{{
  "questions": [
    {{
      "question": "the full question text",
      "expected_answer": "the correct answer"
    }}
  ]
}}
"#,
        title = req.title,
        count = req.number_of_questions,
        question_type = req.question_type,
        topics = req.topics,
        subject = req.subject,
        class = req.class_,
        difficulty = req.difficulty,
        description = req.description,
        max_score = req.max_score,
        passing_score = req.passing_score,
        instructions = req.instructions,
    )
}

pub fn alternatives_prompt(req: &AlternativesRequest) -> String {
    let type_rules = match req.question_type {
        QuestionType::Mcq => {
            "Each alternative is a multiple-choice question: include an \"options\" array with four distinct choices and put the correct choice in \"answer\"."
        }
        QuestionType::ShortAnswer => {
            "Each alternative is a short-answer question answerable in one or two sentences; put a model answer in \"answer\" and omit \"options\"."
        }
        QuestionType::LongAnswer => {
            "Each alternative is a long-answer question needing a structured, multi-paragraph response; put the key points expected in \"answer\" and omit \"options\"."
        }
    };

    format!(
        r#"You are an experienced {subject} teacher. Write exactly 3 alternative versions of the question below. They must test the same subtopic at the same difficulty and be worth the same marks, but must not simply reword the original.

Original question:
Title: {title}
Description: {description}
Subtopic: {subtopic}
Difficulty: {difficulty}
Marks: {marks}
Type: {question_type}

{type_rules}

Return ONLY a JSON array of exactly 3 objects, each with the fields:
- "title": string
- "description": string
- "questionType": "{question_type}"
- "difficulty": string
- "marks": number
- "options": array of strings (MCQ only)
- "answer": string
"#,
        subject = req.subject,
        title = req.title,
        description = req.description,
        subtopic = req.subtopic,
        difficulty = req.difficulty,
        marks = req.marks,
        question_type = req.question_type.as_str(),
        type_rules = type_rules,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<QuestionItem> {
        vec![
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
        ]
    }

    #[test]
    fn evaluation_prompt_numbers_items_and_echoes_ids() {
        let prompt = evaluation_prompt(&items());
        assert!(prompt.starts_with(EVALUATION_INSTRUCTIONS));
        assert!(prompt.contains("1. Question ID: q1\nQuestion: What is the capital of France?"));
        assert!(prompt.contains("2. Question ID: q2\nQuestion: What is 2 + 2?\nStudent Answer: 5\nExpected Answer: 4"));
    }

    #[test]
    fn prompts_are_deterministic() {
        assert_eq!(evaluation_prompt(&items()), evaluation_prompt(&items()));
        assert_eq!(swot_prompt(&items()), swot_prompt(&items()));
    }

    #[test]
    fn swot_prompt_carries_every_answer() {
        let prompt = swot_prompt(&items());
        assert!(prompt.contains("Student Answer: Paris"));
        assert!(prompt.contains("Expected Answer: 4"));
        assert!(!prompt.contains("q1"));
    }

    #[test]
    fn alternatives_prompt_switches_rules_by_type() {
        let mut req = AlternativesRequest {
            id: "a1".into(),
            title: "Photosynthesis".into(),
            description: "Which gas do plants absorb?".into(),
            subtopic: "Plant nutrition".into(),
            difficulty: "easy".into(),
            marks: 1.0,
            question_type: QuestionType::Mcq,
            subject: "Biology".into(),
        };
        let mcq = alternatives_prompt(&req);
        assert!(mcq.contains("\"options\" array"));
        assert!(mcq.contains("\"questionType\": \"MCQ\""));

        req.question_type = QuestionType::LongAnswer;
        let long = alternatives_prompt(&req);
        assert!(long.contains("omit \"options\""));
        assert!(long.contains("LONG_ANSWER"));
    }
}
