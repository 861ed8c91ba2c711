// src/handlers/admin.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::ledger::SubmissionLedger;

/// Lists every recorded submission in arrival order.
/// Admin only when an admin token is configured.
pub async fn list_submissions(State(ledger): State<Arc<SubmissionLedger>>) -> impl IntoResponse {
    Json(ledger.all_submissions().await)
}
