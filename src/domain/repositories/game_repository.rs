use async_trait::async_trait;

use crate::domain::entities::{Answer, FinalizeOutcome, Game, Player, Round, Vote};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Database error: {0}")]
    Database(String),
}

/// Game repository trait
///
/// Every method commits before returning. Methods that touch more than one row
/// run in a single transaction.
#[async_trait]
pub trait GameRepository: Send + Sync {
    // ========== Game operations ==========

    /// Insert a pending game. Fails with `AlreadyExists` when the code is taken.
    async fn create_game(&self, code: &str) -> Result<Game, RepositoryError>;

    /// Find game by join code
    async fn find_game_by_code(&self, code: &str) -> Result<Option<Game>, RepositoryError>;

    // ========== Player operations ==========

    /// Add player to game
    async fn add_player(&self, game_id: i64, name: &str) -> Result<Player, RepositoryError>;

    /// Players of a game in join order
    async fn get_players(&self, game_id: i64) -> Result<Vec<Player>, RepositoryError>;

    /// Mark the player with the most cumulative votes as eliminated.
    /// Ties go to the earliest joiner.
    async fn eliminate_top_player(&self, game_id: i64) -> Result<Option<Player>, RepositoryError>;

    // ========== Round operations ==========

    /// Move the game from round `from_round` to `number` and create that round.
    ///
    /// Also marks the game started. Returns `None` if the game is no longer on
    /// `from_round`, in which case nothing is written.
    async fn open_round(
        &self,
        game_id: i64,
        from_round: u32,
        number: u32,
        question: &str,
        start_time: i64,
    ) -> Result<Option<Round>, RepositoryError>;

    /// Find round by game and number
    async fn find_round(&self, game_id: i64, number: u32) -> Result<Option<Round>, RepositoryError>;

    /// Close a round for answers. Returns false if it was already closed.
    async fn mark_round_ended(&self, round_id: i64) -> Result<bool, RepositoryError>;

    /// Fold the round's votes into player tallies and seal it.
    /// Tallies are applied at most once per round.
    async fn finalize_round(
        &self,
        game_id: i64,
        number: u32,
    ) -> Result<FinalizeOutcome, RepositoryError>;

    // ========== Answer / vote operations ==========

    /// Save answer
    async fn add_answer(
        &self,
        round_id: i64,
        player_id: i64,
        text: &str,
    ) -> Result<Answer, RepositoryError>;

    /// Answers of a round in submission order
    async fn get_answers(&self, round_id: i64) -> Result<Vec<Answer>, RepositoryError>;

    /// Save vote
    async fn add_vote(
        &self,
        round_id: i64,
        voter_id: i64,
        answer_id: i64,
    ) -> Result<Vote, RepositoryError>;
}
