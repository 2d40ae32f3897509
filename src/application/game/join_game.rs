use std::sync::Arc;

use crate::domain::entities::Player;
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Join game input
pub struct JoinGameInput {
    pub code: String,
    pub name: String,
}

/// Join game output
pub struct JoinGameOutput {
    pub player: Player,
}

/// Join game use case
pub struct JoinGame<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> JoinGame<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self, input: JoinGameInput) -> Result<JoinGameOutput, JoinGameError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(JoinGameError::Validation("Player name is required".into()));
        }

        let game = self
            .game_repo
            .find_game_by_code(&input.code)
            .await?
            .ok_or(JoinGameError::GameNotFound)?;

        if !game.can_join() {
            return Err(JoinGameError::GameAlreadyStarted);
        }

        let player = self.game_repo.add_player(game.id, name).await?;
        tracing::info!("Player {} ({}) joined game {}", player.id, player.name, game.code);

        Ok(JoinGameOutput { player })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JoinGameError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Game not found")]
    GameNotFound,
    #[error("Game already started")]
    GameAlreadyStarted,
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
