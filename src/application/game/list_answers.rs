use std::sync::Arc;

use crate::domain::entities::Answer;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// List answers input
pub struct ListAnswersInput {
    pub code: String,
}

/// List answers output
pub struct ListAnswersOutput {
    pub round_number: u32,
    pub answers: Vec<Answer>,
}

/// Answers submitted in the current round, for voters to pick from
pub struct ListAnswers<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> ListAnswers<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: ListAnswersInput,
    ) -> Result<ListAnswersOutput, ListAnswersError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(ListAnswersError::GameNotFound)?;

        let round = self
            .game_repo
            .find_round(game.id, game.current_round)
            .await?
            .ok_or(ListAnswersError::RoundNotFound)?;

        let answers = self.game_repo.get_answers(round.id).await?;

        Ok(ListAnswersOutput {
            round_number: round.number,
            answers,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListAnswersError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Round not found")]
    RoundNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
