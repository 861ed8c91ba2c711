// tests/api_tests.rs

use std::sync::Arc;

use chrono::{Local, TimeZone};
use daily_quiz::{
    bank::QuestionBank, clock::FixedClock, config::Config, ledger::UnknownQuestionPolicy, routes,
    state::AppState,
};

const CORPUS: &str = r#"[
    {"id": 1, "text": "Which planet is known as the Red Planet?", "options": ["Venus", "Mars", "Jupiter"], "answer": 1},
    {"id": 2, "text": "What is 7 x 6?", "options": ["42", "36", "48", "54"], "answer": 0},
    {"id": "bonus", "text": "Largest ocean?", "options": ["Atlantic", "Pacific"], "answer": 1}
]"#;

struct TestApp {
    address: String,
    clock: Arc<FixedClock>,
}

/// Helper function to spawn the app on a random port for testing.
async fn spawn_app(config: Config) -> TestApp {
    let bank = QuestionBank::new(QuestionBank::parse(CORPUS).expect("Corpus must parse"))
        .expect("Corpus must validate");

    // 1. A controllable clock, starting on March 5th
    let clock = Arc::new(FixedClock::new(
        Local.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(),
    ));

    // 2. Create the router with the app state
    let state = AppState::new(bank, clock.clone(), config);
    let app = routes::create_router(state);

    // 3. Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");

    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    // 4. Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, clock }
}

fn unique_user() -> String {
    format!("u_{}", &uuid::Uuid::new_v4().to_string()[..8])
}

async fn submit(
    client: &reqwest::Client,
    app: &TestApp,
    body: serde_json::Value,
) -> reqwest::Response {
    client
        .post(&format!("{}/api/answer", app.address))
        .json(&body)
        .send()
        .await
        .expect("Failed to execute request")
}

#[tokio::test]
async fn health_check_404() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();

    let response = client
        .get(&format!("{}/random_path_that_does_not_exist", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn daily_question_rotates_with_the_day() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();

    // March 5th: 5 % 3 == 2
    let today: serde_json::Value = client
        .get(&format!("{}/api/question", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .unwrap();
    assert_eq!(today["id"], "bonus");
    assert!(today.get("answer").is_none(), "Answer must be withheld");

    // March 6th: 6 % 3 == 0
    app.clock.advance_days(1);
    let tomorrow: serde_json::Value = client
        .get(&format!("{}/api/question", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tomorrow["id"], 1);
}

#[tokio::test]
async fn all_questions_are_listed_without_answers() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();

    let questions: Vec<serde_json::Value> = client
        .get(&format!("{}/api/questions", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(questions.len(), 3);
    assert_eq!(questions[1]["text"], "What is 7 x 6?");
    assert!(questions.iter().all(|q| q.get("answer").is_none()));
}

#[tokio::test]
async fn submission_is_idempotent_per_day() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();
    let username = unique_user();
    let body = serde_json::json!({"id": 1, "answer": 1, "username": username});

    let first: serde_json::Value = submit(&client, &app, body.clone()).await.json().await.unwrap();
    assert_eq!(first, serde_json::json!({"correct": true, "alreadyAnswered": false}));

    let second: serde_json::Value = submit(&client, &app, body.clone()).await.json().await.unwrap();
    assert_eq!(second, serde_json::json!({"correct": true, "alreadyAnswered": true}));

    app.clock.advance_days(1);
    let next_day: serde_json::Value = submit(&client, &app, body).await.json().await.unwrap();
    assert_eq!(next_day, serde_json::json!({"correct": true, "alreadyAnswered": false}));

    let responses: Vec<serde_json::Value> = client
        .get(&format!("{}/api/responses", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["username"], username);
    assert_eq!(responses[0]["date"], "2024-03-05");
    assert_eq!(responses[1]["date"], "2024-03-06");
}

#[tokio::test]
async fn malformed_answers_grade_incorrect() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();

    for answer in [
        serde_json::json!("banana"),
        serde_json::json!(17),
        serde_json::json!(null),
    ] {
        let response = submit(
            &client,
            &app,
            serde_json::json!({"id": 2, "answer": answer, "username": unique_user()}),
        )
        .await;
        assert_eq!(response.status().as_u16(), 200);

        let outcome: serde_json::Value = response.json().await.unwrap();
        assert_eq!(outcome["correct"], false);
    }

    // Numeric strings are accepted
    let outcome: serde_json::Value = submit(
        &client,
        &app,
        serde_json::json!({"id": 2, "answer": "0", "username": unique_user()}),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(outcome["correct"], true);
}

#[tokio::test]
async fn malformed_payloads_are_graded_not_rejected() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();

    let cases = [
        (serde_json::json!({"id": 1, "answer": 0, "username": null}), false),
        (serde_json::json!({"id": 1, "answer": 1, "username": 42}), true),
        (serde_json::json!({"id": 1.0, "answer": 1, "username": unique_user()}), true),
        (serde_json::json!({"answer": 0, "username": unique_user()}), false),
        (serde_json::json!({"id": null, "answer": 0, "username": unique_user()}), false),
        (serde_json::json!({"id": [1], "answer": 0, "username": unique_user()}), false),
        (serde_json::json!(["not", "an", "object"]), false),
    ];

    for (body, expected) in cases {
        let response = submit(&client, &app, body.clone()).await;
        assert_eq!(response.status().as_u16(), 200, "{} should be accepted", body);

        let outcome: serde_json::Value = response.json().await.unwrap();
        assert_eq!(outcome["correct"], expected, "{} graded wrongly", body);
        assert_eq!(outcome["alreadyAnswered"], false, "{} was deduplicated", body);
    }

    let responses: Vec<serde_json::Value> = client
        .get(&format!("{}/api/responses", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(responses.len(), 7);
    assert_eq!(responses[0]["username"], "");
    assert_eq!(responses[1]["username"], "42");
    assert_eq!(responses[2]["id"], 1);
    assert!(responses[3]["id"].is_null());
}

#[tokio::test]
async fn unknown_question_is_recorded_by_default() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();

    let outcome: serde_json::Value = submit(
        &client,
        &app,
        serde_json::json!({"id": "nonexistent", "answer": 0, "username": "alice"}),
    )
    .await
    .json()
    .await
    .unwrap();
    assert_eq!(outcome, serde_json::json!({"correct": false, "alreadyAnswered": false}));

    let responses: Vec<serde_json::Value> = client
        .get(&format!("{}/api/responses", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], "nonexistent");
}

#[tokio::test]
async fn unknown_question_is_404_under_reject_policy() {
    let config = Config {
        unknown_question_policy: UnknownQuestionPolicy::Reject,
        ..Config::default()
    };
    let app = spawn_app(config).await;
    let client = reqwest::Client::new();

    let response = submit(
        &client,
        &app,
        serde_json::json!({"id": 99, "answer": 0, "username": "alice"}),
    )
    .await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn responses_are_guarded_when_admin_token_is_set() {
    let config = Config {
        admin_token: Some("let-me-in".to_string()),
        ..Config::default()
    };
    let app = spawn_app(config).await;
    let client = reqwest::Client::new();

    let denied = client
        .get(&format!("{}/api/responses", app.address))
        .send()
        .await
        .unwrap();
    assert_eq!(denied.status().as_u16(), 401);

    let allowed = client
        .get(&format!("{}/api/responses", app.address))
        .header("Authorization", "Bearer let-me-in")
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status().as_u16(), 200);
}

#[tokio::test]
async fn leaderboard_counts_correct_answers() {
    let app = spawn_app(Config::default()).await;
    let client = reqwest::Client::new();
    let winner = unique_user();
    let loser = unique_user();

    submit(&client, &app, serde_json::json!({"id": 1, "answer": 1, "username": winner})).await;
    submit(&client, &app, serde_json::json!({"id": 2, "answer": 0, "username": winner})).await;
    submit(&client, &app, serde_json::json!({"id": 1, "answer": 0, "username": loser})).await;

    let board: Vec<serde_json::Value> = client
        .get(&format!("{}/api/leaderboard?limit=5", app.address))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(board.len(), 2);
    assert_eq!(board[0]["username"], winner);
    assert_eq!(board[0]["correct"], 2);
    assert_eq!(board[1]["correct"], 0);
    assert_eq!(board[1]["answered"], 1);
}
