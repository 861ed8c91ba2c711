// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    bank::QuestionBank,
    clock::Clock,
    error::AppError,
    ledger::SubmissionLedger,
    models::submission::SubmitAnswerRequest,
};

const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
const MAX_LEADERBOARD_LIMIT: usize = 100;

/// Returns today's question without its answer.
///
/// Responds 404 when no questions are loaded.
pub async fn get_daily_question(
    State(bank): State<Arc<QuestionBank>>,
    State(clock): State<Arc<dyn Clock>>,
) -> Result<impl IntoResponse, AppError> {
    let question = bank.question_of_the_day(clock.today()).map_err(|e| {
        tracing::warn!("Daily question requested from an empty bank");
        AppError::from(e)
    })?;

    Ok(Json(question.to_public()))
}

/// Lists every question in corpus order, answers withheld.
pub async fn list_questions(State(bank): State<Arc<QuestionBank>>) -> impl IntoResponse {
    Json(bank.all())
}

/// Grades an answer and records it once per user, question and day.
///
/// Any JSON body is accepted; malformed fields grade as incorrect.
pub async fn submit_answer(
    State(ledger): State<Arc<SubmissionLedger>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, AppError> {
    let req = SubmitAnswerRequest::from_body(body);
    let outcome = ledger
        .record_answer(req.question_id(), &req.answer, &req.username())
        .await?;

    Ok(Json(outcome))
}

/// Query parameters for the leaderboard.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<usize>,
}

/// Ranks users by number of correct submissions.
pub async fn get_leaderboard(
    State(ledger): State<Arc<SubmissionLedger>>,
    Query(params): Query<LeaderboardParams>,
) -> impl IntoResponse {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LEADERBOARD_LIMIT)
        .min(MAX_LEADERBOARD_LIMIT);

    Json(ledger.leaderboard(limit).await)
}
