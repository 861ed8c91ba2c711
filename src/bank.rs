// src/bank.rs

use std::{collections::HashSet, fs, path::Path};

use chrono::{Datelike, NaiveDate};
use validator::Validate;

use crate::{
    error::QuizError,
    models::question::{PublicQuestion, Question, QuestionId},
};

/// The question corpus, loaded once at startup and never mutated.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Builds a bank from already-parsed questions, validating every record.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizError> {
        validate_questions(&questions)?;
        Ok(Self { questions })
    }

    /// Parses a JSON array of questions.
    ///
    /// Fails closed: one bad record rejects the whole corpus.
    pub fn parse(source: &str) -> Result<Vec<Question>, QuizError> {
        let questions: Vec<Question> =
            serde_json::from_str(source).map_err(|e| QuizError::Load(e.to_string()))?;
        validate_questions(&questions)?;
        Ok(questions)
    }

    /// Reads the corpus file at `path`.
    ///
    /// Any failure is logged and yields an empty bank, so the server still
    /// starts and reports "no question" instead of crashing.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = fs::read_to_string(path)
            .map_err(|e| QuizError::Load(format!("{}: {}", path.display(), e)))
            .and_then(|source| Self::parse(&source));

        match loaded {
            Ok(questions) => {
                tracing::info!("Loaded {} questions from {}", questions.len(), path.display());
                Self { questions }
            }
            Err(e) => {
                tracing::error!("Error loading questions: {}", e);
                Self::default()
            }
        }
    }

    /// Selects the question for `date`: day-of-month (1-based) modulo bank size.
    pub fn question_of_the_day(&self, date: NaiveDate) -> Result<&Question, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        let idx = date.day() as usize % self.questions.len();
        Ok(&self.questions[idx])
    }

    /// All questions in corpus order, with answers withheld.
    pub fn all(&self) -> Vec<PublicQuestion> {
        self.questions.iter().map(Question::to_public).collect()
    }

    pub fn by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| &q.id == id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn validate_questions(questions: &[Question]) -> Result<(), QuizError> {
    let mut seen = HashSet::new();
    for q in questions {
        q.validate()
            .map_err(|e| QuizError::Load(format!("question {}: {}", q.id, e)))?;
        if q.answer >= q.options.len() {
            return Err(QuizError::Load(format!(
                "question {}: answer index {} out of range for {} options",
                q.id,
                q.answer,
                q.options.len()
            )));
        }
        if !seen.insert(&q.id) {
            return Err(QuizError::Load(format!("duplicate question id {}", q.id)));
        }
    }
    Ok(())
}
