use std::sync::Arc;

use crate::domain::entities::Round;
use crate::domain::repositories::{GameRepository, RepositoryError};
use crate::domain::services::{question_for_round, Clock};
use crate::domain::value_objects::GameSettings;

/// Start game input
pub struct StartGameInput {
    pub code: String,
}

/// Start game output
pub struct StartGameOutput {
    pub round: Round,
}

/// Start game use case: closes the lobby and opens round 1
pub struct StartGame<G: GameRepository> {
    game_repo: Arc<G>,
    settings: Arc<GameSettings>,
    clock: Arc<dyn Clock>,
}

impl<G: GameRepository> StartGame<G> {
    pub fn new(game_repo: Arc<G>, settings: Arc<GameSettings>, clock: Arc<dyn Clock>) -> Self {
        Self {
            game_repo,
            settings,
            clock,
        }
    }

    pub async fn execute(&self, input: StartGameInput) -> Result<StartGameOutput, StartGameError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(StartGameError::GameNotFound)?;

        if game.started {
            return Err(StartGameError::GameAlreadyStarted);
        }

        let question = question_for_round(&self.settings.questions, 1)
            .ok_or(StartGameError::NoQuestions)?;

        // A concurrent start that got there first leaves us nothing to open
        let round = self
            .game_repo
            .open_round(game.id, 0, 1, question, self.clock.now())
            .await?
            .ok_or(StartGameError::GameAlreadyStarted)?;

        tracing::info!("Game {} started, round 1: {}", game.code, round.question);

        Ok(StartGameOutput { round })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StartGameError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Game already started")]
    GameAlreadyStarted,
    #[error("No questions configured")]
    NoQuestions,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
