use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::application::game::{
    CreateGame, CreateGameError, GetQuestion, GetQuestionError, GetQuestionInput, JoinGame,
    JoinGameError, JoinGameInput, ListAnswers, ListAnswersError, ListAnswersInput, ListPlayers,
    ListPlayersError, ListPlayersInput, NextRound, NextRoundError, NextRoundInput,
    NextRoundOutput, StartGame, StartGameError, StartGameInput, SubmitAnswer, SubmitAnswerError,
    SubmitAnswerInput, SubmitVote, SubmitVoteError, SubmitVoteInput,
};
use crate::domain::repositories::RepositoryError;

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub player_id: i64,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub player_id: i64,
    pub answer_id: i64,
}

// Response types
#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct JoinGameResponse {
    pub player_id: i64,
}

#[derive(Debug, Serialize)]
pub struct StartGameResponse {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub round: u32,
    pub question: String,
    pub time_left: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NextRoundResponse {
    Advanced {
        round: u32,
        question: String,
    },
    GameOver {
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        eliminated_player_id: Option<i64>,
    },
}

#[derive(Debug, Serialize)]
pub struct PlayerInfo {
    pub player_id: i64,
    pub name: String,
    pub votes: i64,
    pub eliminated: bool,
}

#[derive(Debug, Serialize)]
pub struct PlayersResponse {
    pub players: Vec<PlayerInfo>,
}

#[derive(Debug, Serialize)]
pub struct AnswerInfo {
    pub answer_id: i64,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnswersResponse {
    pub round: u32,
    pub answers: Vec<AnswerInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, code: &str, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
            details: None,
        }),
    )
}

/// Storage failures are not recoverable by the client
fn internal_error(e: RepositoryError) -> ApiError {
    tracing::error!("Storage failure: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
            code: "INTERNAL_ERROR".to_string(),
            details: Some(e.to_string()),
        }),
    )
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /game - Create a new game
pub async fn create_game(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CreateGameResponse>, ApiError> {
    let use_case = CreateGame::new(state.game_repo.clone());
    let result = use_case.execute().await.map_err(|e| match e {
        CreateGameError::CodeSpaceExhausted(_) => {
            tracing::error!("{}", e);
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "CODE_SPACE_EXHAUSTED", e)
        }
        CreateGameError::Repository(e) => internal_error(e),
    })?;

    Ok(Json(CreateGameResponse {
        code: result.game.code,
    }))
}

/// POST /game/:code/join - Join a game that has not started yet
pub async fn join_game(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(body): Json<JoinRequest>,
) -> Result<Json<JoinGameResponse>, ApiError> {
    let use_case = JoinGame::new(state.game_repo.clone());
    let result = use_case
        .execute(JoinGameInput {
            code,
            name: body.name,
        })
        .await
        .map_err(|e| match e {
            JoinGameError::Validation(_) => api_error(StatusCode::BAD_REQUEST, "INVALID_NAME", e),
            JoinGameError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            JoinGameError::GameAlreadyStarted => {
                api_error(StatusCode::BAD_REQUEST, "GAME_ALREADY_STARTED", e)
            }
            JoinGameError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(JoinGameResponse {
        player_id: result.player.id,
    }))
}

/// POST /game/:code/start - Close the lobby and open round 1
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<StartGameResponse>, ApiError> {
    let use_case = StartGame::new(
        state.game_repo.clone(),
        state.settings.clone(),
        state.clock.clone(),
    );
    let result = use_case
        .execute(StartGameInput { code })
        .await
        .map_err(|e| match e {
            StartGameError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            StartGameError::GameAlreadyStarted => {
                api_error(StatusCode::BAD_REQUEST, "GAME_ALREADY_STARTED", e)
            }
            StartGameError::NoQuestions => {
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "NO_QUESTIONS", e)
            }
            StartGameError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(StartGameResponse {
        question: result.round.question,
    }))
}

/// GET /game/:code/question - Current question and seconds left
pub async fn get_question(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let use_case = GetQuestion::new(
        state.game_repo.clone(),
        state.settings.clone(),
        state.clock.clone(),
    );
    let result = use_case
        .execute(GetQuestionInput { code })
        .await
        .map_err(|e| match e {
            GetQuestionError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            GetQuestionError::RoundNotFound => {
                api_error(StatusCode::NOT_FOUND, "ROUND_NOT_FOUND", e)
            }
            GetQuestionError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(QuestionResponse {
        round: result.round_number,
        question: result.question,
        time_left: result.time_left,
    }))
}

/// POST /game/:code/answer - Submit an answer to the current round
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(body): Json<AnswerRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let use_case = SubmitAnswer::new(state.game_repo.clone());
    use_case
        .execute(SubmitAnswerInput {
            code,
            player_id: body.player_id,
            text: body.text,
        })
        .await
        .map_err(|e| match e {
            SubmitAnswerError::GameNotFound => {
                api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e)
            }
            SubmitAnswerError::RoundNotFound => {
                api_error(StatusCode::NOT_FOUND, "ROUND_NOT_FOUND", e)
            }
            SubmitAnswerError::RoundEnded => api_error(StatusCode::BAD_REQUEST, "ROUND_ENDED", e),
            SubmitAnswerError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(StatusResponse::ok()))
}

/// POST /game/:code/vote - Vote for an answer once the round has closed
pub async fn submit_vote(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Json(body): Json<VoteRequest>,
) -> Result<Json<StatusResponse>, ApiError> {
    let use_case = SubmitVote::new(state.game_repo.clone());
    use_case
        .execute(SubmitVoteInput {
            code,
            player_id: body.player_id,
            answer_id: body.answer_id,
        })
        .await
        .map_err(|e| match e {
            SubmitVoteError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            SubmitVoteError::RoundNotFound => {
                api_error(StatusCode::NOT_FOUND, "ROUND_NOT_FOUND", e)
            }
            SubmitVoteError::RoundStillActive => {
                api_error(StatusCode::BAD_REQUEST, "ROUND_STILL_ACTIVE", e)
            }
            SubmitVoteError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(StatusResponse::ok()))
}

/// POST /game/:code/next_round - Score the current round and move on
pub async fn next_round(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<NextRoundResponse>, ApiError> {
    let use_case = NextRound::new(
        state.game_repo.clone(),
        state.settings.clone(),
        state.clock.clone(),
    );
    let result = use_case
        .execute(NextRoundInput { code })
        .await
        .map_err(|e| match e {
            NextRoundError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            NextRoundError::GameNotStarted => {
                api_error(StatusCode::BAD_REQUEST, "GAME_NOT_STARTED", e)
            }
            NextRoundError::AlreadyAdvanced => {
                api_error(StatusCode::BAD_REQUEST, "ROUND_ALREADY_ADVANCED", e)
            }
            NextRoundError::NoQuestions => {
                api_error(StatusCode::INTERNAL_SERVER_ERROR, "NO_QUESTIONS", e)
            }
            NextRoundError::Repository(e) => internal_error(e),
        })?;

    let response = match result {
        NextRoundOutput::Advanced { round } => NextRoundResponse::Advanced {
            round: round.number,
            question: round.question,
        },
        NextRoundOutput::GameOver { eliminated } => NextRoundResponse::GameOver {
            status: "game_over".to_string(),
            eliminated_player_id: eliminated.map(|p| p.id),
        },
    };

    Ok(Json(response))
}

/// GET /game/:code/players - Roster with running vote tallies
pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<PlayersResponse>, ApiError> {
    let use_case = ListPlayers::new(state.game_repo.clone());
    let result = use_case
        .execute(ListPlayersInput { code })
        .await
        .map_err(|e| match e {
            ListPlayersError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            ListPlayersError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(PlayersResponse {
        players: result
            .players
            .into_iter()
            .map(|p| PlayerInfo {
                player_id: p.id,
                name: p.name,
                votes: p.votes,
                eliminated: p.eliminated,
            })
            .collect(),
    }))
}

/// GET /game/:code/answers - Answers in the current round, authors hidden
pub async fn list_answers(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<AnswersResponse>, ApiError> {
    let use_case = ListAnswers::new(state.game_repo.clone());
    let result = use_case
        .execute(ListAnswersInput { code })
        .await
        .map_err(|e| match e {
            ListAnswersError::GameNotFound => api_error(StatusCode::NOT_FOUND, "GAME_NOT_FOUND", e),
            ListAnswersError::RoundNotFound => {
                api_error(StatusCode::NOT_FOUND, "ROUND_NOT_FOUND", e)
            }
            ListAnswersError::Repository(e) => internal_error(e),
        })?;

    Ok(Json(AnswersResponse {
        round: result.round_number,
        answers: result
            .answers
            .into_iter()
            .map(|a| AnswerInfo {
                answer_id: a.id,
                text: a.text,
            })
            .collect(),
    }))
}
