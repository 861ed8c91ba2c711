// src/models/question.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Identifier of a question as it appears in the corpus and in requests.
///
/// Integer and string ids are distinct: `1` never matches `"1"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Int(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Int(id) => write!(f, "{}", id),
            QuestionId::Text(id) => write!(f, "{:?}", id),
        }
    }
}

impl QuestionId {
    /// Reads an id out of a raw request value.
    ///
    /// Integral numbers (including `1.0`) become `Int`, strings become
    /// `Text`. Anything else is `None` and never matches a question.
    pub fn from_raw(raw: &Value) -> Option<Self> {
        match raw {
            Value::Number(n) => n.as_i64().map(QuestionId::Int).or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| QuestionId::Int(f as i64))
            }),
            Value::String(s) => Some(QuestionId::Text(s.clone())),
            _ => None,
        }
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        QuestionId::Int(id)
    }
}

impl From<&str> for QuestionId {
    fn from(id: &str) -> Self {
        QuestionId::Text(id.to_string())
    }
}

/// A multiple-choice question loaded from the corpus file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Question {
    pub id: QuestionId,

    #[validate(length(min = 1, message = "Question text cannot be empty."))]
    pub text: String,

    /// Answer options, displayed in this order.
    #[validate(length(min = 2, message = "A question needs at least two options."))]
    pub options: Vec<String>,

    /// Index into `options` of the correct answer.
    pub answer: usize,
}

impl Question {
    /// Projection sent to players (excludes the answer).
    pub fn to_public(&self) -> PublicQuestion {
        PublicQuestion {
            id: self.id.clone(),
            text: self.text.clone(),
            options: self.options.clone(),
        }
    }
}

/// DTO for sending a question to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicQuestion {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
}
