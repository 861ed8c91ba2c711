// src/main.rs

use daily_quiz::bank::QuestionBank;
use daily_quiz::clock::SystemClock;
use daily_quiz::config::Config;
use daily_quiz::routes;
use daily_quiz::state::AppState;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Load the corpus once; a broken file leaves the bank empty.
    let bank = QuestionBank::load(&config.questions_path);
    if bank.is_empty() {
        tracing::warn!("Question bank is empty, daily question requests will return 404");
    }

    tracing::info!(
        "Unknown question policy: {}",
        config.unknown_question_policy
    );
    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set, /api/responses is open to everyone");
    }

    let port = config.port;
    let state = AppState::new(bank, Arc::new(SystemClock), config);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;

    Ok(())
}
