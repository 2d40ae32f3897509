use std::sync::Arc;

use crate::domain::entities::Answer;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Submit answer input
pub struct SubmitAnswerInput {
    pub code: String,
    pub player_id: i64,
    pub text: String,
}

/// Submit answer output
pub struct SubmitAnswerOutput {
    pub answer: Answer,
}

/// Submit answer use case
///
/// The player is not checked against the game and may answer more than once.
pub struct SubmitAnswer<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> SubmitAnswer<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: SubmitAnswerInput,
    ) -> Result<SubmitAnswerOutput, SubmitAnswerError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(SubmitAnswerError::GameNotFound)?;

        let round = self
            .game_repo
            .find_round(game.id, game.current_round)
            .await?
            .ok_or(SubmitAnswerError::RoundNotFound)?;

        if !round.accepts_answers() {
            return Err(SubmitAnswerError::RoundEnded);
        }

        let answer = self
            .game_repo
            .add_answer(round.id, input.player_id, &input.text)
            .await?;

        tracing::debug!(
            "Answer {} from player {} in round {} of game {}",
            answer.id,
            input.player_id,
            round.number,
            game.code
        );

        Ok(SubmitAnswerOutput { answer })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitAnswerError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Round not found")]
    RoundNotFound,
    #[error("Round ended")]
    RoundEnded,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
