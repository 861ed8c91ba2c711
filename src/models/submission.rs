// src/models/submission.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::question::QuestionId;

/// A recorded answer. One exists at most per (username, id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub username: String,

    /// Question id as submitted (may not exist in the bank). `None` when
    /// the request carried no usable id.
    pub id: Option<QuestionId>,

    /// Selected option index, `None` when the raw answer was not numeric.
    pub answer: Option<i64>,

    pub correct: bool,

    pub timestamp: DateTime<Utc>,

    /// Local calendar day used to deduplicate submissions.
    pub date: NaiveDate,
}

/// DTO for submitting an answer.
///
/// Every field is kept as raw JSON and read leniently, so a malformed
/// payload is graded as incorrect instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct SubmitAnswerRequest {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub answer: Value,
    #[serde(default)]
    pub username: Value,
}

impl SubmitAnswerRequest {
    /// Reads a request out of any JSON body. A body that is not an object
    /// yields an empty request.
    pub fn from_body(body: Value) -> Self {
        serde_json::from_value(body).unwrap_or_default()
    }

    pub fn question_id(&self) -> Option<QuestionId> {
        QuestionId::from_raw(&self.id)
    }

    /// Strings are taken as-is, missing or null becomes `""`, other values
    /// use their JSON text (`42` becomes `"42"`).
    pub fn username(&self) -> String {
        match &self.username {
            Value::String(name) => name.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Result of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub already_answered: bool,
}

/// Aggregated per-user row for the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    pub correct: u64,
    pub answered: u64,
}
