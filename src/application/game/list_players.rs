use std::sync::Arc;

use crate::domain::entities::Player;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// List players input
pub struct ListPlayersInput {
    pub code: String,
}

/// List players output
pub struct ListPlayersOutput {
    pub players: Vec<Player>,
}

/// Lobby roster and running scores of a game
pub struct ListPlayers<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> ListPlayers<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(
        &self,
        input: ListPlayersInput,
    ) -> Result<ListPlayersOutput, ListPlayersError> {
        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(ListPlayersError::GameNotFound)?;

        let players = self.game_repo.get_players(game.id).await?;

        Ok(ListPlayersOutput { players })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ListPlayersError {
    #[error("Game not found")]
    GameNotFound,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
