use std::sync::Arc;

use crate::application::game::{FinalizeRound, FinalizeRoundInput};
use crate::domain::entities::{Player, Round};
use crate::domain::repositories::{GameRepository, RepositoryError};
use crate::domain::services::{is_game_over, question_for_round, Clock};
use crate::domain::value_objects::GameSettings;

/// Next round input
pub struct NextRoundInput {
    pub code: String,
}

/// Next round output
pub enum NextRoundOutput {
    /// A new round is open for answers
    Advanced { round: Round },
    /// The last round has been scored
    GameOver { eliminated: Option<Player> },
}

/// Next round use case
///
/// Scores the current round, then either opens the next one or, after the
/// final round, eliminates the player with the most votes.
pub struct NextRound<G: GameRepository> {
    game_repo: Arc<G>,
    settings: Arc<GameSettings>,
    clock: Arc<dyn Clock>,
}

impl<G: GameRepository> NextRound<G> {
    pub fn new(game_repo: Arc<G>, settings: Arc<GameSettings>, clock: Arc<dyn Clock>) -> Self {
        Self {
            game_repo,
            settings,
            clock,
        }
    }

    pub async fn execute(&self, input: NextRoundInput) -> Result<NextRoundOutput, NextRoundError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(NextRoundError::GameNotFound)?;

        if !game.started {
            return Err(NextRoundError::GameNotStarted);
        }

        FinalizeRound::new(self.game_repo.clone())
            .execute(FinalizeRoundInput {
                game_id: game.id,
                round_number: game.current_round,
            })
            .await?;

        let next = game.next_round_number();

        if is_game_over(next, self.settings.total_rounds) {
            let eliminated = self.game_repo.eliminate_top_player(game.id).await?;
            match &eliminated {
                Some(player) => tracing::info!(
                    "Game {} over: {} eliminated with {} votes",
                    game.code,
                    player.name,
                    player.votes
                ),
                None => tracing::info!("Game {} over with no players", game.code),
            }
            return Ok(NextRoundOutput::GameOver { eliminated });
        }

        let question = question_for_round(&self.settings.questions, next)
            .ok_or(NextRoundError::NoQuestions)?;

        let round = self
            .game_repo
            .open_round(game.id, game.current_round, next, question, self.clock.now())
            .await?
            .ok_or(NextRoundError::AlreadyAdvanced)?;

        tracing::info!("Game {} advanced to round {}: {}", game.code, next, round.question);

        Ok(NextRoundOutput::Advanced { round })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NextRoundError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Game not started")]
    GameNotStarted,
    #[error("Round was already advanced")]
    AlreadyAdvanced,
    #[error("No questions configured")]
    NoQuestions,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
