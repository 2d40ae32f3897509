use std::sync::Arc;

use crate::domain::repositories::{GameRepository, RepositoryError};
use crate::domain::services::Clock;
use crate::domain::value_objects::GameSettings;

/// Get question input
pub struct GetQuestionInput {
    pub code: String,
}

/// Get question output
pub struct GetQuestionOutput {
    pub round_number: u32,
    pub question: String,
    pub time_left: i64,
}

/// Get question use case.
///
/// This is also where rounds expire: there is no timer task, so the first poll
/// that sees the clock at zero closes the round for answers.
pub struct GetQuestion<G: GameRepository> {
    game_repo: Arc<G>,
    settings: Arc<GameSettings>,
    clock: Arc<dyn Clock>,
}

impl<G: GameRepository> GetQuestion<G> {
    pub fn new(game_repo: Arc<G>, settings: Arc<GameSettings>, clock: Arc<dyn Clock>) -> Self {
        Self {
            game_repo,
            settings,
            clock,
        }
    }

    pub async fn execute(
        &self,
        input: GetQuestionInput,
    ) -> Result<GetQuestionOutput, GetQuestionError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(GetQuestionError::GameNotFound)?;

        let round = self
            .game_repo
            .find_round(game.id, game.current_round)
            .await?
            .ok_or(GetQuestionError::RoundNotFound)?;

        let now = self.clock.now();
        let time_left = round.time_left(self.settings.round_duration_secs, now);

        if round.needs_expiry(self.settings.round_duration_secs, now)
            && self.game_repo.mark_round_ended(round.id).await?
        {
            tracing::info!("Round {} of game {} expired", round.number, game.code);
        }

        Ok(GetQuestionOutput {
            round_number: round.number,
            question: round.question,
            time_left,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GetQuestionError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Round not found")]
    RoundNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
