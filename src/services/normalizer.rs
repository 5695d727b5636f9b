//! Turns raw model text into typed results.
//!
//! Model output is untrusted: it may arrive wrapped in Markdown code fences,
//! carry missing or oddly-typed fields, or be truncated. Every function here
//! either returns a complete result or an `Error::Normalization` / `Error::Json`;
//! partial results are never produced.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};
use crate::models::assessment::{QuestionItem, ScoreDetail, SwotResult};
use crate::models::question::{AlternativeQuestion, GeneratedQuestion, QuestionType};

const FENCE: &str = "```";
pub const MAX_SCORE: f64 = 10.0;
pub const ALTERNATIVE_COUNT: usize = 3;
const QUESTIONS_SHAPE: &str = "an object with a questions array";

/// Removes Markdown code-fence lines from a fenced payload.
///
/// Only applies when the trimmed text opens with a fence; every line that is a
/// bare fence or a fence with a language tag is dropped. Unfenced text is
/// returned trimmed and otherwise untouched.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.starts_with(FENCE) {
        return trimmed.to_string();
    }
    trimmed
        .lines()
        .filter(|line| !is_fence_line(line))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn is_fence_line(line: &str) -> bool {
    match line.trim().strip_prefix(FENCE) {
        Some(tag) => tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '.')),
        None => false,
    }
}

/// Strips fences and parses the remainder as JSON.
pub fn parse_model_json(raw: &str) -> Result<JsonValue> {
    let content = strip_code_fences(raw);
    if content.is_empty() {
        return Err(Error::Normalization("model returned an empty response".to_string()));
    }
    Ok(serde_json::from_str(&content)?)
}

/// Maps the model's per-question evaluations back onto the submission.
///
/// The output must have one entry per submitted item. When every entry echoes a
/// `question_id` the entries are paired by id, otherwise (no entry carries an
/// id) they are paired by position. Details always follow submission order.
pub fn normalize_evaluation(raw: &str, items: &[QuestionItem]) -> Result<Vec<ScoreDetail>> {
    let value = parse_model_json(raw)?;
    let entries = value
        .as_array()
        .ok_or_else(|| shape_error("evaluation", "a JSON array", &value))?;

    if entries.len() != items.len() {
        return Err(Error::Normalization(format!(
            "expected {} evaluations, model returned {}",
            items.len(),
            entries.len()
        )));
    }

    let objects = entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            entry.as_object().ok_or_else(|| {
                Error::Normalization(format!("evaluation entry {} is not an object", idx))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let paired = pair_entries(&objects, items)?;

    items
        .iter()
        .zip(paired)
        .map(|(item, entry)| score_detail(item, entry))
        .collect()
}

/// Returns one entry per item, in item order.
///
/// Pairing by id only applies when the submission's ids are unique once
/// trimmed; otherwise entries are taken in position order.
fn pair_entries<'a>(
    entries: &[&'a Map<String, JsonValue>],
    items: &[QuestionItem],
) -> Result<Vec<&'a Map<String, JsonValue>>> {
    let echoed: Vec<Option<String>> = entries
        .iter()
        .map(|e| e.get("question_id").and_then(id_string))
        .collect();
    let with_id = echoed.iter().filter(|id| id.is_some()).count();

    if with_id == 0 {
        return Ok(entries.to_vec());
    }

    let keys: Vec<&str> = items.iter().map(|item| item.question_id.trim()).collect();
    let mut distinct = HashSet::new();
    if keys.iter().any(|key| key.is_empty() || !distinct.insert(*key)) {
        tracing::debug!("submission ids are not unique, pairing evaluations by position");
        return Ok(entries.to_vec());
    }

    if with_id != entries.len() {
        return Err(Error::Normalization(format!(
            "{} of {} evaluations echo a question_id; cannot pair partially",
            with_id,
            entries.len()
        )));
    }

    let mut by_id: HashMap<String, &'a Map<String, JsonValue>> = HashMap::new();
    for (id, entry) in echoed.into_iter().flatten().zip(entries.iter()) {
        if by_id.insert(id.clone(), *entry).is_some() {
            return Err(Error::Normalization(format!(
                "question_id {} appears more than once in model output",
                id
            )));
        }
    }

    keys.iter()
        .map(|key| {
            by_id.get(*key).copied().ok_or_else(|| {
                Error::Normalization(format!(
                    "model output has no evaluation for question_id {}",
                    key
                ))
            })
        })
        .collect()
}

fn id_string(v: &JsonValue) -> Option<String> {
    match v {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn score_detail(item: &QuestionItem, entry: &Map<String, JsonValue>) -> Result<ScoreDetail> {
    Ok(ScoreDetail {
        question_id: item.question_id.clone(),
        question: text_field(entry, "question")?,
        score: score_field(entry, &item.question_id)?,
        correct: bool_field(entry, "correct")?,
        feedback: text_field(entry, "feedback")?,
    })
}

fn score_field(entry: &Map<String, JsonValue>, question_id: &str) -> Result<f64> {
    let score = match entry.get("score") {
        None | Some(JsonValue::Null) => 0.0,
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            Error::Normalization(format!("score {:?} is not a number", s))
        })?,
        Some(other) => return Err(type_error("score", "a number", other)),
    };
    if !score.is_finite() {
        return Err(Error::Normalization(format!("score {} is not finite", score)));
    }
    if !(0.0..=MAX_SCORE).contains(&score) {
        tracing::warn!(question_id, score, "model score outside 0-10, clamping");
    }
    Ok(score.clamp(0.0, MAX_SCORE))
}

fn bool_field(entry: &Map<String, JsonValue>, key: &str) -> Result<bool> {
    match entry.get(key) {
        None | Some(JsonValue::Null) => Ok(false),
        Some(JsonValue::Bool(b)) => Ok(*b),
        Some(JsonValue::Number(n)) => Ok(n.as_f64().map(|f| f != 0.0).unwrap_or(false)),
        Some(JsonValue::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" => Ok(true),
            "false" | "no" | "" => Ok(false),
            _ => Err(Error::Normalization(format!("{} {:?} is not a boolean", key, s))),
        },
        Some(other) => Err(type_error(key, "a boolean", other)),
    }
}

fn text_field(entry: &Map<String, JsonValue>, key: &str) -> Result<String> {
    match entry.get(key) {
        None | Some(JsonValue::Null) => Ok(String::new()),
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Array(parts)) if parts.iter().all(JsonValue::is_string) => Ok(parts
            .iter()
            .filter_map(JsonValue::as_str)
            .collect::<Vec<_>>()
            .join("\n")),
        Some(other) => Err(type_error(key, "a string", other)),
    }
}

pub fn normalize_swot(raw: &str) -> Result<SwotResult> {
    let value = parse_model_json(raw)?;
    let obj = value
        .as_object()
        .ok_or_else(|| shape_error("SWOT analysis", "a JSON object", &value))?;

    Ok(SwotResult {
        strengths: text_field(obj, "strengths")?,
        weaknesses: text_field(obj, "weaknesses")?,
        opportunities: text_field(obj, "opportunities")?,
        threats: text_field(obj, "threats")?,
    })
}

/// Accepts `{"questions": [...]}` or a list whose first element is that object.
/// Keeps at most `limit` questions.
pub fn normalize_generated_questions(raw: &str, limit: usize) -> Result<Vec<GeneratedQuestion>> {
    let value = parse_model_json(raw)?;
    let envelope = match &value {
        JsonValue::Object(obj) => obj,
        JsonValue::Array(list) => match list.first() {
            Some(JsonValue::Object(obj)) => obj,
            _ => return Err(shape_error("question generation", QUESTIONS_SHAPE, &value)),
        },
        other => return Err(shape_error("question generation", QUESTIONS_SHAPE, other)),
    };

    let questions = envelope
        .get("questions")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| {
            Error::Normalization("question generation output has no questions array".to_string())
        })?;

    let mut out = questions
        .iter()
        .enumerate()
        .map(|(idx, q)| generated_question(idx, q))
        .collect::<Result<Vec<_>>>()?;

    if out.len() > limit {
        tracing::warn!(returned = out.len(), limit, "model returned extra questions, truncating");
        out.truncate(limit);
    } else if out.len() < limit {
        tracing::warn!(
            returned = out.len(),
            limit,
            "model returned fewer questions than requested"
        );
    }
    Ok(out)
}

fn generated_question(idx: usize, value: &JsonValue) -> Result<GeneratedQuestion> {
    let obj = value.as_object().ok_or_else(|| {
        Error::Normalization(format!("generated question {} is not an object", idx))
    })?;
    let question = match obj.get("question") {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => {
            return Err(Error::Normalization(format!(
                "generated question {} has no question text",
                idx
            )))
        }
    };
    // Short numeric answers ("4") often come back as JSON numbers.
    let expected_answer = match obj.get("expected_answer") {
        Some(JsonValue::String(s)) => s.clone(),
        Some(v @ (JsonValue::Number(_) | JsonValue::Bool(_))) => v.to_string(),
        _ => {
            return Err(Error::Normalization(format!(
                "generated question {} has no expected_answer",
                idx
            )))
        }
    };
    Ok(GeneratedQuestion {
        question,
        expected_answer,
    })
}

/// Requires exactly three alternatives matching the question schema.
pub fn normalize_alternatives(raw: &str) -> Result<Vec<AlternativeQuestion>> {
    let value = parse_model_json(raw)?;
    let entries = value
        .as_array()
        .ok_or_else(|| shape_error("alternatives", "a JSON array", &value))?;

    if entries.len() != ALTERNATIVE_COUNT {
        return Err(Error::Normalization(format!(
            "expected {} alternative questions, model returned {}",
            ALTERNATIVE_COUNT,
            entries.len()
        )));
    }

    entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let alt: AlternativeQuestion = serde_json::from_value(entry.clone()).map_err(|e| {
                Error::Normalization(format!("alternative {} is malformed: {}", idx, e))
            })?;
            if alt.question_type == QuestionType::Mcq
                && alt.options.as_ref().map_or(0, Vec::len) < 2
            {
                return Err(Error::Normalization(format!(
                    "alternative {} is MCQ but has fewer than two options",
                    idx
                )));
            }
            Ok(alt)
        })
        .collect()
}

fn shape_error(what: &str, expected: &str, got: &JsonValue) -> Error {
    Error::Normalization(format!(
        "{} output must be {}, got {}",
        what,
        expected,
        json_type(got)
    ))
}

fn type_error(key: &str, expected: &str, got: &JsonValue) -> Error {
    Error::Normalization(format!("{} must be {}, got {}", key, expected, json_type(got)))
}

fn json_type(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
