//! AI-response normalization: free model text → `AiAnalysis`.
//!
//! The outcome is decided once, at parse time: either a fully populated
//! `Critique` or the untouched raw text. Parse failures never leave this
//! module as errors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::llm_client::strip_json_fences;

pub const FALLBACK_HR_QUESTIONS: [&str; 5] = [
    "Tell me about yourself.",
    "What are your strengths and weaknesses?",
    "Describe a challenging project you worked on.",
    "Why do you want this job?",
    "Where do you see yourself in 5 years?",
];

pub const FALLBACK_TIPS: [&str; 5] = [
    "Use more quantified achievements.",
    "Highlight relevant technical and soft skills.",
    "Keep formatting clean and consistent.",
    "Tailor your resume to the job description.",
    "Proofread for grammar and spelling errors.",
];

pub fn fallback_hr_questions() -> Vec<String> {
    FALLBACK_HR_QUESTIONS.iter().map(|s| s.to_string()).collect()
}

pub fn fallback_tips() -> Vec<String> {
    FALLBACK_TIPS.iter().map(|s| s.to_string()).collect()
}

/// Structured critique. Every field is always populated: absent lists are
/// empty, absent `hr_questions`/`tips` hold the fixed fallbacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Critique {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub hr_questions: Vec<String>,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiAnalysis {
    Structured(Critique),
    /// The model's full, untouched response.
    Raw(String),
}

impl AiAnalysis {
    pub fn is_structured(&self) -> bool {
        matches!(self, AiAnalysis::Structured(_))
    }
}

#[derive(Debug, Error)]
pub enum CritiqueParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Converts a model response into an `AiAnalysis`.
pub fn normalize_response(raw: &str) -> AiAnalysis {
    match parse_critique(raw) {
        Ok(critique) => AiAnalysis::Structured(critique),
        Err(e) => {
            tracing::warn!("AI response was not structured ({e}); keeping raw text");
            AiAnalysis::Raw(raw.to_string())
        }
    }
}

/// Strips whitespace and code fences, then parses the six critique keys.
pub fn parse_critique(raw: &str) -> Result<Critique, CritiqueParseError> {
    let cleaned = strip_json_fences(raw);
    let value: Value = serde_json::from_str(cleaned)?;
    let map = match value {
        Value::Object(map) => map,
        other => return Err(CritiqueParseError::NotAnObject(json_kind(&other))),
    };

    Ok(Critique {
        strengths: string_list(&map, "strengths").unwrap_or_default(),
        weaknesses: string_list(&map, "weaknesses").unwrap_or_default(),
        missing_keywords: string_list(&map, "missing_keywords").unwrap_or_default(),
        suggestions: string_list(&map, "suggestions").unwrap_or_default(),
        hr_questions: string_list(&map, "hr_questions").unwrap_or_else(fallback_hr_questions),
        tips: string_list(&map, "tips").unwrap_or_else(fallback_tips),
    })
}

/// `None` when the key is absent or not an array. Non-string items are
/// rendered as their JSON text; nulls are dropped.
fn string_list(map: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let items = map.get(key)?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
    )
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
