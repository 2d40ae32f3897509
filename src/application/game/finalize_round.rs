use std::sync::Arc;

use crate::domain::entities::FinalizeOutcome;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Finalize round input
pub struct FinalizeRoundInput {
    pub game_id: i64,
    pub round_number: u32,
}

/// Finalize round use case
///
/// Credits every vote cast for an answer to that answer's author and seals
/// the round. A missing round is a no-op, and a round is only ever credited
/// once.
pub struct FinalizeRound<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> FinalizeRound<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: FinalizeRoundInput) -> Result<FinalizeOutcome, RepositoryError> {
        let outcome = self
            .game_repo
            .finalize_round(input.game_id, input.round_number)
            .await?;

        match &outcome {
            FinalizeOutcome::RoundMissing => {
                tracing::debug!(
                    "No round {} for game {}; nothing to finalize",
                    input.round_number,
                    input.game_id
                );
            }
            FinalizeOutcome::AlreadyFinalized => {
                tracing::debug!(
                    "Round {} of game {} already finalized",
                    input.round_number,
                    input.game_id
                );
            }
            FinalizeOutcome::Finalized(tallies) => {
                let total: i64 = tallies.iter().map(|t| t.votes).sum();
                tracing::info!(
                    "Finalized round {} of game {}: {} votes across {} players",
                    input.round_number,
                    input.game_id,
                    total,
                    tallies.len()
                );
            }
        }

        Ok(outcome)
    }
}
