// src/state.rs

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{bank::QuestionBank, clock::Clock, config::Config, ledger::SubmissionLedger};

#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    pub ledger: Arc<SubmissionLedger>,
    pub clock: Arc<dyn Clock>,
    pub config: Config,
}

impl AppState {
    /// Wires the ledger to the same bank and clock the handlers see.
    pub fn new(bank: QuestionBank, clock: Arc<dyn Clock>, config: Config) -> Self {
        let bank = Arc::new(bank);
        let ledger = Arc::new(SubmissionLedger::new(
            bank.clone(),
            clock.clone(),
            config.unknown_question_policy,
        ));
        Self {
            bank,
            ledger,
            clock,
            config,
        }
    }
}

impl FromRef<AppState> for Arc<QuestionBank> {
    fn from_ref(state: &AppState) -> Self {
        state.bank.clone()
    }
}

impl FromRef<AppState> for Arc<SubmissionLedger> {
    fn from_ref(state: &AppState) -> Self {
        state.ledger.clone()
    }
}

impl FromRef<AppState> for Arc<dyn Clock> {
    fn from_ref(state: &AppState) -> Self {
        state.clock.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
