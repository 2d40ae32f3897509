pub mod game;
pub mod health;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/game", create_game_router(state.clone()))
        .route("/health", get(health::health_handler))
        .with_state(state)
}

/// Create game router
fn create_game_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(game::create_game))
        .route("/:code/join", post(game::join_game))
        .route("/:code/start", post(game::start_game))
        .route("/:code/question", get(game::get_question))
        .route("/:code/answer", post(game::submit_answer))
        .route("/:code/vote", post(game::submit_vote))
        .route("/:code/next_round", post(game::next_round))
        .route("/:code/players", get(game::list_players))
        .route("/:code/answers", get(game::list_answers))
        .with_state(state)
}
