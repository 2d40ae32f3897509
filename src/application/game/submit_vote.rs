use std::sync::Arc;

use crate::domain::entities::Vote;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Submit vote input
pub struct SubmitVoteInput {
    pub code: String,
    pub player_id: i64,
    pub answer_id: i64,
}

/// Submit vote output
pub struct SubmitVoteOutput {
    pub vote: Vote,
}

/// Submit vote use case
///
/// Voting opens once the current round is closed for answers. Self-votes,
/// repeat votes and answers from other rounds are all accepted.
pub struct SubmitVote<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> SubmitVote<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: SubmitVoteInput) -> Result<SubmitVoteOutput, SubmitVoteError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(SubmitVoteError::GameNotFound)?;

        let round = self
            .game_repo
            .find_round(game.id, game.current_round)
            .await?
            .ok_or(SubmitVoteError::RoundNotFound)?;

        if !round.accepts_votes() {
            return Err(SubmitVoteError::RoundStillActive);
        }

        let vote = self
            .game_repo
            .add_vote(round.id, input.player_id, input.answer_id)
            .await?;

        tracing::debug!(
            "Vote {} by player {} for answer {} in game {}",
            vote.id,
            input.player_id,
            input.answer_id,
            game.code
        );

        Ok(SubmitVoteOutput { vote })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitVoteError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Round not found")]
    RoundNotFound,
    #[error("Round still active")]
    RoundStillActive,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
