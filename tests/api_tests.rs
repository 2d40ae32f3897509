//! API Integration Tests for the Fibble backend
//!
//! Drives the HTTP router end to end against an in-memory SQLite database,
//! with a manual clock standing in for wall time so rounds can expire on demand.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::{Service, ServiceExt};

use fibble_backend::api;
use fibble_backend::domain::services::ManualClock;
use fibble_backend::domain::value_objects::{GameSettings, DEFAULT_QUESTIONS};
use fibble_backend::infrastructure::app_state::AppState;
use fibble_backend::infrastructure::config::AppConfig;

const T0: i64 = 1_700_000_000;

/// Helper to create a test application
async fn create_test_app() -> (Router, Arc<ManualClock>) {
    create_test_app_with(GameSettings::default()).await
}

async fn create_test_app_with(settings: GameSettings) -> (Router, Arc<ManualClock>) {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        settings,
        ..Default::default()
    };
    let clock = Arc::new(ManualClock::new(T0));

    let state = AppState::new(&config, clock.clone())
        .await
        .expect("Failed to create app state");
    let state = Arc::new(state);

    let app = Router::new()
        .merge(api::routes::create_api_router(state.clone()))
        .with_state(state);

    (app, clock)
}

/// Test application over a file database with a multi-connection pool, so
/// concurrent requests really run on separate SQLite connections
async fn create_file_backed_app(path: &std::path::Path) -> (Router, Arc<ManualClock>) {
    let config = AppConfig {
        database_url: format!("sqlite:{}", path.display()),
        max_connections: 8,
        ..Default::default()
    };
    let clock = Arc::new(ManualClock::new(T0));

    let state = AppState::new(&config, clock.clone())
        .await
        .expect("Failed to create app state");
    let state = Arc::new(state);

    let app = Router::new()
        .merge(api::routes::create_api_router(state.clone()))
        .with_state(state);

    (app, clock)
}

fn temp_database_path(name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("fibble-{}-{}-{}.db", name, std::process::id(), nanos))
}

fn remove_database(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm", "-journal"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

async fn send(app: &mut Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = ServiceExt::<Request<Body>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with JSON body
async fn post_json(app: &mut Router, path: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Helper to make a POST request without a body
async fn post_empty(app: &mut Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Helper to make a GET request
async fn get(app: &mut Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

async fn create_game(app: &mut Router) -> String {
    let (status, body) = post_empty(app, "/game").await;
    assert_eq!(status, StatusCode::OK);
    body["code"].as_str().unwrap().to_string()
}

async fn join(app: &mut Router, code: &str, name: &str) -> i64 {
    let (status, body) = post_json(app, &format!("/game/{}/join", code), json!({ "name": name })).await;
    assert_eq!(status, StatusCode::OK);
    body["player_id"].as_i64().unwrap()
}

async fn answer(app: &mut Router, code: &str, player_id: i64, text: &str) -> (StatusCode, Value) {
    post_json(
        app,
        &format!("/game/{}/answer", code),
        json!({ "player_id": player_id, "text": text }),
    )
    .await
}

async fn vote(app: &mut Router, code: &str, player_id: i64, answer_id: i64) -> (StatusCode, Value) {
    post_json(
        app,
        &format!("/game/{}/vote", code),
        json!({ "player_id": player_id, "answer_id": answer_id }),
    )
    .await
}

/// Let the round clock run out and poll once so the round is closed
async fn expire_round(app: &mut Router, clock: &ManualClock, code: &str) {
    clock.advance(60);
    let (status, body) = get(app, &format!("/game/{}/question", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["time_left"], 0);
}

/// Answer ids of the current round, in submission order
async fn answer_ids(app: &mut Router, code: &str) -> Vec<i64> {
    let (status, body) = get(app, &format!("/game/{}/answers", code)).await;
    assert_eq!(status, StatusCode::OK);
    body["answers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["answer_id"].as_i64().unwrap())
        .collect()
}

// ============================================================================
// Game creation / lobby
// ============================================================================

#[tokio::test]
async fn test_create_game_returns_four_letter_code() {
    let (mut app, _) = create_test_app().await;

    let code = create_game(&mut app).await;
    assert_eq!(code.len(), 4);
    assert!(code.chars().all(|c| c.is_ascii_uppercase()));
}

#[tokio::test]
async fn test_join_returns_distinct_player_ids() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;

    let a = join(&mut app, &code, "Alice").await;
    let b = join(&mut app, &code, "Bob").await;
    let c = join(&mut app, &code, "Alice").await;
    assert_ne!(a, b);
    assert_ne!(b, c);
    assert_ne!(a, c);

    let (status, body) = get(&mut app, &format!("/game/{}/players", code)).await;
    assert_eq!(status, StatusCode::OK);
    let players = body["players"].as_array().unwrap();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0]["name"], "Alice");
    assert_eq!(players[0]["votes"], 0);
    assert_eq!(players[0]["eliminated"], false);
}

#[tokio::test]
async fn test_join_unknown_game() {
    let (mut app, _) = create_test_app().await;

    let (status, body) = post_json(&mut app, "/game/ZZZZ/join", json!({ "name": "Alice" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");
}

#[tokio::test]
async fn test_join_with_blank_name() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;

    let (status, body) = post_json(&mut app, &format!("/game/{}/join", code), json!({ "name": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_NAME");
}

#[tokio::test]
async fn test_join_after_start_fails() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;
    join(&mut app, &code, "Alice").await;

    let (status, _) = post_empty(&mut app, &format!("/game/{}/start", code)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post_json(&mut app, &format!("/game/{}/join", code), json!({ "name": "Late" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GAME_ALREADY_STARTED");
}

// ============================================================================
// Start / question polling
// ============================================================================

#[tokio::test]
async fn test_start_game_returns_first_question() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;

    let (status, body) = post_empty(&mut app, &format!("/game/{}/start", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["question"], DEFAULT_QUESTIONS[0]);
}

#[tokio::test]
async fn test_start_twice_fails() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;

    post_empty(&mut app, &format!("/game/{}/start", code)).await;
    let (status, body) = post_empty(&mut app, &format!("/game/{}/start", code)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GAME_ALREADY_STARTED");
}

#[tokio::test]
async fn test_start_unknown_game() {
    let (mut app, _) = create_test_app().await;

    let (status, _) = post_empty(&mut app, "/game/NOPE/start").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_question_before_start_is_not_found() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;

    let (status, body) = get(&mut app, &format!("/game/{}/question", code)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "ROUND_NOT_FOUND");

    let (status, body) = get(&mut app, "/game/NOPE/question").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "GAME_NOT_FOUND");
}

#[tokio::test]
async fn test_time_left_counts_down_and_floors_at_zero() {
    let (mut app, clock) = create_test_app().await;
    let code = create_game(&mut app).await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;

    let path = format!("/game/{}/question", code);
    let mut last = i64::MAX;
    for step in [0, 10, 25, 24, 1, 30, 600] {
        clock.advance(step);
        let (status, body) = get(&mut app, &path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"], DEFAULT_QUESTIONS[0]);
        let left = body["time_left"].as_i64().unwrap();
        assert!(left <= last, "time_left went up: {} -> {}", last, left);
        assert!(left >= 0);
        last = left;
    }
    assert_eq!(last, 0);
}

// ============================================================================
// Answers and votes
// ============================================================================

#[tokio::test]
async fn test_answers_close_once_time_runs_out() {
    let (mut app, clock) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;

    let (status, body) = answer(&mut app, &code, alice, "Paris").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    // Duplicate answers are accepted
    let (status, _) = answer(&mut app, &code, alice, "Lyon").await;
    assert_eq!(status, StatusCode::OK);

    expire_round(&mut app, &clock, &code).await;

    let (status, body) = answer(&mut app, &code, alice, "Too late").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ROUND_ENDED");
}

#[tokio::test]
async fn test_expiry_is_lazy() {
    let (mut app, clock) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;

    // Nobody polled, so the round is still open even though time is up
    clock.advance(120);
    let (status, _) = answer(&mut app, &code, alice, "sneaky").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&mut app, &format!("/game/{}/question", code)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = answer(&mut app, &code, alice, "blocked").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_vote_only_after_round_ends() {
    let (mut app, clock) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    let bob = join(&mut app, &code, "Bob").await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;

    answer(&mut app, &code, alice, "Paris").await;
    let ids = answer_ids(&mut app, &code).await;

    let (status, body) = vote(&mut app, &code, bob, ids[0]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "ROUND_STILL_ACTIVE");

    expire_round(&mut app, &clock, &code).await;

    let (status, body) = vote(&mut app, &code, bob, ids[0]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_answer_and_vote_on_unstarted_game() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;

    let (status, _) = answer(&mut app, &code, 1, "x").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = vote(&mut app, &code, 1, 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = answer(&mut app, "NOPE", 1, "x").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_answers_listing_hides_authors() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;
    answer(&mut app, &code, alice, "Paris").await;

    let (status, body) = get(&mut app, &format!("/game/{}/answers", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round"], 1);
    assert_eq!(body["answers"][0]["text"], "Paris");
    assert!(body["answers"][0].get("player_id").is_none());
}

// ============================================================================
// Rounds and elimination
// ============================================================================

#[tokio::test]
async fn test_next_round_unknown_or_pending_game() {
    let (mut app, _) = create_test_app().await;

    let (status, _) = post_empty(&mut app, "/game/NOPE/next_round").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let code = create_game(&mut app).await;
    let (status, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "GAME_NOT_STARTED");
}

#[tokio::test]
async fn test_full_game_two_players() {
    let (mut app, clock) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    let bob = join(&mut app, &code, "Bob").await;

    let (_, body) = post_empty(&mut app, &format!("/game/{}/start", code)).await;
    assert_eq!(body["question"], DEFAULT_QUESTIONS[0]);

    for round in 1..=3u32 {
        answer(&mut app, &code, alice, "from alice").await;
        answer(&mut app, &code, bob, "from bob").await;
        let ids = answer_ids(&mut app, &code).await;
        assert_eq!(ids.len(), 2);

        expire_round(&mut app, &clock, &code).await;

        // Each votes for the other's answer
        assert_eq!(vote(&mut app, &code, alice, ids[1]).await.0, StatusCode::OK);
        assert_eq!(vote(&mut app, &code, bob, ids[0]).await.0, StatusCode::OK);

        let (status, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
        assert_eq!(status, StatusCode::OK);

        let (_, players) = get(&mut app, &format!("/game/{}/players", code)).await;
        assert_eq!(players["players"][0]["votes"], round as i64);
        assert_eq!(players["players"][1]["votes"], round as i64);

        if round < 3 {
            assert_eq!(body["round"], round + 1);
            assert_eq!(body["question"], DEFAULT_QUESTIONS[round as usize]);
        } else {
            assert_eq!(body["status"], "game_over");
        }
    }

    let (_, body) = get(&mut app, &format!("/game/{}/players", code)).await;
    let eliminated: Vec<&Value> = body["players"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["eliminated"] == true)
        .collect();
    assert_eq!(eliminated.len(), 1);
}

#[tokio::test]
async fn test_most_voted_player_is_eliminated() {
    let (mut app, clock) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    let bob = join(&mut app, &code, "Bob").await;
    let carol = join(&mut app, &code, "Carol").await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;

    answer(&mut app, &code, alice, "a").await;
    answer(&mut app, &code, carol, "c").await;
    let ids = answer_ids(&mut app, &code).await;
    expire_round(&mut app, &clock, &code).await;

    vote(&mut app, &code, alice, ids[1]).await;
    vote(&mut app, &code, bob, ids[1]).await;
    vote(&mut app, &code, carol, ids[0]).await;

    // Rounds 2 and 3 pass with no votes
    for expected in [json!({ "round": 2, "question": DEFAULT_QUESTIONS[1] }), json!({ "round": 3, "question": DEFAULT_QUESTIONS[2] })] {
        let (status, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, expected);
    }

    let (status, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "game_over");
    assert_eq!(body["eliminated_player_id"], carol);

    // Calling again neither re-scores nor eliminates anyone else
    let (status, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "game_over");
    assert_eq!(body["eliminated_player_id"], carol);

    let (_, body) = get(&mut app, &format!("/game/{}/players", code)).await;
    let players = body["players"].as_array().unwrap();
    assert_eq!(players[0]["votes"], 1);
    assert_eq!(players[1]["votes"], 0);
    assert_eq!(players[2]["votes"], 2);
    assert_eq!(players[2]["eliminated"], true);
    assert_eq!(players.iter().filter(|p| p["eliminated"] == true).count(), 1);
    assert_eq!(players[1]["player_id"], bob);
}

#[tokio::test]
async fn test_next_round_seals_active_round() {
    let (mut app, _) = create_test_app().await;
    let code = create_game(&mut app).await;
    let alice = join(&mut app, &code, "Alice").await;
    post_empty(&mut app, &format!("/game/{}/start", code)).await;

    // Advancing without waiting for expiry still scores round 1 and opens round 2
    let (status, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round"], 2);

    let (status, body) = get(&mut app, &format!("/game/{}/question", code)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["round"], 2);
    assert_eq!(body["time_left"], 60);

    let (status, _) = answer(&mut app, &code, alice, "round two").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_questions_cycle_when_rounds_exceed_list() {
    let settings = GameSettings {
        questions: vec!["only one?".to_string()],
        total_rounds: 2,
        ..Default::default()
    };
    let (mut app, _) = create_test_app_with(settings).await;
    let code = create_game(&mut app).await;

    let (_, body) = post_empty(&mut app, &format!("/game/{}/start", code)).await;
    assert_eq!(body["question"], "only one?");

    let (_, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
    assert_eq!(body, json!({ "round": 2, "question": "only one?" }));

    // No players joined, so nobody is eliminated
    let (_, body) = post_empty(&mut app, &format!("/game/{}/next_round", code)).await;
    assert_eq!(body, json!({ "status": "game_over" }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_next_round_losers_get_bad_request() {
    let path = temp_database_path("next-round-race");
    let (mut app, clock) = create_file_backed_app(&path).await;

    for _ in 0..10 {
        let code = create_game(&mut app).await;
        let alice = join(&mut app, &code, "Alice").await;
        let bob = join(&mut app, &code, "Bob").await;
        post_empty(&mut app, &format!("/game/{}/start", code)).await;

        answer(&mut app, &code, alice, "mine").await;
        let ids = answer_ids(&mut app, &code).await;
        expire_round(&mut app, &clock, &code).await;
        assert_eq!(vote(&mut app, &code, bob, ids[0]).await.0, StatusCode::OK);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let app = app.clone();
                let uri = format!("/game/{}/next_round", code);
                tokio::spawn(async move {
                    let request = Request::builder()
                        .method("POST")
                        .uri(uri)
                        .body(Body::empty())
                        .unwrap();
                    let response = ServiceExt::<Request<Body>>::oneshot(app, request).await.unwrap();
                    let status = response.status();
                    let bytes = response.into_body().collect().await.unwrap().to_bytes();
                    let body: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
                    (status, body)
                })
            })
            .collect();

        let mut advanced = 0;
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            match status {
                StatusCode::OK => advanced += 1,
                StatusCode::BAD_REQUEST => assert_eq!(body["code"], "ROUND_ALREADY_ADVANCED"),
                other => panic!("unexpected status {} with body {}", other, body),
            }
        }
        assert!(advanced >= 1);

        // The single round-one vote is credited exactly once
        let (_, body) = get(&mut app, &format!("/game/{}/players", code)).await;
        let players = body["players"].as_array().unwrap();
        assert_eq!(players[0]["votes"], 1);
        assert_eq!(players[1]["votes"], 0);
    }

    remove_database(&path);
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (mut app, _) = create_test_app().await;

    let (status, body) = get(&mut app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_reports_unreachable_database() {
    let config = AppConfig {
        database_url: "sqlite::memory:".to_string(),
        ..Default::default()
    };
    let state = Arc::new(
        AppState::new(&config, Arc::new(ManualClock::new(T0)))
            .await
            .expect("Failed to create app state"),
    );
    state.game_repo.get_db().close().await;

    let mut app = Router::new()
        .merge(api::routes::create_api_router(state.clone()))
        .with_state(state);

    let (status, body) = get(&mut app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "unreachable");
}
