use std::sync::Arc;

use crate::domain::entities::{generate_join_code, Game};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// Attempts before giving up on finding a free join code
const MAX_CODE_ATTEMPTS: usize = 16;

/// Create game output
pub struct CreateGameOutput {
    pub game: Game,
}

/// Create game use case
pub struct CreateGame<G: GameRepository> {
    game_repo: Arc<G>,
}

impl<G: GameRepository> CreateGame<G> {
    pub fn new(game_repo: Arc<G>) -> Self {
        Self { game_repo }
    }

    pub async fn execute(&self) -> Result<CreateGameOutput, CreateGameError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_join_code(&mut rand::thread_rng());

            match self.game_repo.create_game(&code).await {
                Ok(game) => {
                    tracing::info!("Created game {} (id {})", game.code, game.id);
                    return Ok(CreateGameOutput { game });
                }
                // The UNIQUE constraint on games.code caught a collision; draw again
                Err(RepositoryError::AlreadyExists(_)) => {
                    tracing::warn!("Join code {} already taken (attempt {})", code, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(CreateGameError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CreateGameError {
    #[error("No free join code after {0} attempts")]
    CodeSpaceExhausted(usize),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
