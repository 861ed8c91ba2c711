// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{admin, quiz},
    state::AppState,
    utils::auth::admin_middleware,
};

/// Assembles the main application router.
///
/// * Public quiz routes (daily question, question list, answer, leaderboard).
/// * Submission listing behind the admin middleware.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&state.config.cors_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/question", get(quiz::get_daily_question))
        .route("/questions", get(quiz::list_questions))
        .route("/answer", post(quiz::submit_answer))
        .route("/leaderboard", get(quiz::get_leaderboard));

    let admin_routes = Router::new()
        .route("/responses", get(admin::list_submissions))
        .layer(middleware::from_fn_with_state(state.clone(), admin_middleware));

    Router::new()
        .nest("/api", quiz_routes.merge(admin_routes))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return AllowOrigin::from(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    AllowOrigin::list(parsed)
}
