// src/ledger.rs

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
    sync::Arc,
};

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::{
    bank::QuestionBank,
    clock::Clock,
    error::QuizError,
    models::{
        question::{Question, QuestionId},
        submission::{AnswerOutcome, LeaderboardEntry, Submission},
    },
};

/// What to do with a submission whose question id is not in the bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownQuestionPolicy {
    /// Grade as incorrect and record it anyway.
    #[default]
    Record,
    /// Refuse the submission with `QuizError::UnknownQuestion`.
    Reject,
}

impl FromStr for UnknownQuestionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "record" => Ok(Self::Record),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown policy '{}', expected 'record' or 'reject'", other)),
        }
    }
}

impl fmt::Display for UnknownQuestionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

type DedupKey = (String, Option<QuestionId>, NaiveDate);

#[derive(Debug, Default)]
struct LedgerInner {
    submissions: Vec<Submission>,
    answered: HashSet<DedupKey>,
}

/// Append-only record of graded submissions, one per user, question and day.
pub struct SubmissionLedger {
    bank: Arc<QuestionBank>,
    clock: Arc<dyn Clock>,
    policy: UnknownQuestionPolicy,
    inner: RwLock<LedgerInner>,
}

impl SubmissionLedger {
    pub fn new(bank: Arc<QuestionBank>, clock: Arc<dyn Clock>, policy: UnknownQuestionPolicy) -> Self {
        Self {
            bank,
            clock,
            policy,
            inner: RwLock::new(LedgerInner::default()),
        }
    }

    /// Grades `raw_answer` and records it unless this user already answered
    /// this question today.
    ///
    /// The grade is always computed fresh, even on the already-answered path.
    /// Non-numeric answers grade as incorrect and never fail.
    pub async fn record_answer(
        &self,
        question_id: Option<QuestionId>,
        raw_answer: &Value,
        username: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        let selected = parse_answer(raw_answer);

        let correct = match question_id.as_ref().and_then(|id| self.bank.by_id(id)) {
            Some(question) => grade(question, selected),
            None => match self.policy {
                UnknownQuestionPolicy::Record => {
                    tracing::debug!("Grading unknown question {} as incorrect", label(&question_id));
                    false
                }
                UnknownQuestionPolicy::Reject => {
                    return Err(QuizError::UnknownQuestion(label(&question_id)));
                }
            },
        };

        let now = self.clock.now();
        let date = now.date_naive();

        // Check and insert under one write lock so concurrent duplicates
        // cannot both land.
        let mut inner = self.inner.write().await;
        if !inner
            .answered
            .insert((username.to_string(), question_id.clone(), date))
        {
            return Ok(AnswerOutcome {
                correct,
                already_answered: true,
            });
        }

        tracing::info!(
            "Recorded answer from '{}' for question {} on {} (correct: {})",
            username,
            label(&question_id),
            date,
            correct
        );
        inner.submissions.push(Submission {
            username: username.to_string(),
            id: question_id,
            answer: selected,
            correct,
            timestamp: now.with_timezone(&Utc),
            date,
        });

        Ok(AnswerOutcome {
            correct,
            already_answered: false,
        })
    }

    /// Every submission in insertion order.
    pub async fn all_submissions(&self) -> Vec<Submission> {
        self.inner.read().await.submissions.clone()
    }

    /// Users ranked by correct answers, then fewest attempts, then name.
    pub async fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let inner = self.inner.read().await;

        let mut totals: HashMap<&str, (u64, u64)> = HashMap::new();
        for s in &inner.submissions {
            let entry = totals.entry(s.username.as_str()).or_default();
            if s.correct {
                entry.0 += 1;
            }
            entry.1 += 1;
        }

        let mut board: Vec<LeaderboardEntry> = totals
            .into_iter()
            .map(|(username, (correct, answered))| LeaderboardEntry {
                username: username.to_string(),
                correct,
                answered,
            })
            .collect();
        board.sort_by(|a, b| {
            b.correct
                .cmp(&a.correct)
                .then(a.answered.cmp(&b.answered))
                .then_with(|| a.username.cmp(&b.username))
        });
        board.truncate(limit);
        board
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.submissions.len()
    }
}

fn label(id: &Option<QuestionId>) -> String {
    id.as_ref()
        .map_or_else(|| "<missing>".to_string(), QuestionId::to_string)
}

fn grade(question: &Question, selected: Option<i64>) -> bool {
    selected.is_some_and(|idx| usize::try_from(idx).is_ok_and(|idx| idx == question.answer))
}

/// Reads an option index out of a raw JSON answer.
///
/// Strings are read as a base-10 integer prefix after leading whitespace,
/// so `" 2"` and `"2abc"` both give 2. Numbers are read the same way from
/// their JavaScript text: plain decimals truncate toward zero, while values
/// printed in exponent form (`1e-7`, `1e+21`) keep only the leading digit.
/// Everything else is `None`.
pub fn parse_answer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(parse_float)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_float(f: f64) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-6..1e21).contains(&magnitude) {
        // JavaScript prints these as `d.ddde±x`.
        return parse_int_prefix(&format!("{:e}", f));
    }
    if magnitude >= i64::MAX as f64 {
        return None;
    }
    Some(f.trunc() as i64)
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: i64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
