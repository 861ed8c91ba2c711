// src/config.rs

use std::{env, fmt::Display, str::FromStr};

use dotenvy::dotenv;

use crate::ledger::UnknownQuestionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub questions_path: String,
    pub port: u16,
    pub rust_log: String,
    pub log_dir: String,
    /// Bearer token guarding the submissions listing. `None` leaves it open.
    pub admin_token: Option<String>,
    pub unknown_question_policy: UnknownQuestionPolicy,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_path: "questions.json".to_string(),
            port: 5000,
            rust_log: "info".to_string(),
            log_dir: "logs".to_string(),
            admin_token: None,
            unknown_question_policy: UnknownQuestionPolicy::Record,
            cors_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let questions_path = env::var("QUESTIONS_PATH").unwrap_or(defaults.questions_path);

        let port = parse_or("PORT", defaults.port);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let log_dir = env::var("LOG_DIR").unwrap_or(defaults.log_dir);

        let admin_token = env::var("ADMIN_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        let unknown_question_policy =
            parse_or("UNKNOWN_QUESTION_POLICY", defaults.unknown_question_policy);

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        Self {
            questions_path,
            port,
            rust_log,
            log_dir,
            admin_token,
            unknown_question_policy,
            cors_origins,
        }
    }
}

/// Reads and parses `key`, warning and falling back to `default` when invalid.
fn parse_or<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_value(key, env::var(key).ok().as_deref(), default)
}

fn parse_value<T>(key: &str, raw: Option<&str>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {} value '{}': {}, using default {}", key, raw, e, default);
            default
        }),
        None => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
