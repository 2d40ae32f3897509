use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::{Answer, FinalizeOutcome, Game, Player, Round, Vote, VoteTally};
use crate::domain::repositories::{GameRepository, RepositoryError};

/// SQLite implementation of GameRepository
pub struct SqliteGameRepository {
    pool: SqlitePool,
}

impl SqliteGameRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database pool for direct queries
    pub fn get_db(&self) -> &SqlitePool {
        &self.pool
    }

    fn row_to_game(row: &sqlx::sqlite::SqliteRow) -> Result<Game, RepositoryError> {
        use sqlx::Row;

        Ok(Game {
            id: row.get("id"),
            code: row.get("code"),
            started: row.get("started"),
            current_round: round_number(row, "current_round")?,
        })
    }

    fn row_to_player(row: &sqlx::sqlite::SqliteRow) -> Player {
        use sqlx::Row;

        Player {
            id: row.get("id"),
            game_id: row.get("game_id"),
            name: row.get("name"),
            eliminated: row.get("eliminated"),
            votes: row.get("votes"),
        }
    }

    fn row_to_round(row: &sqlx::sqlite::SqliteRow) -> Result<Round, RepositoryError> {
        use sqlx::Row;

        Ok(Round {
            id: row.get("id"),
            game_id: row.get("game_id"),
            number: round_number(row, "number")?,
            question: row.get("question"),
            start_time: row.get("start_time"),
            ended: row.get("ended"),
            finalized: row.get("finalized"),
        })
    }

    fn row_to_answer(row: &sqlx::sqlite::SqliteRow) -> Answer {
        use sqlx::Row;

        Answer {
            id: row.get("id"),
            round_id: row.get("round_id"),
            player_id: row.get("player_id"),
            text: row.get("text"),
        }
    }
}

/// Round counters are stored as INTEGER; anything outside `u32` is corrupt data
fn round_number(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<u32, RepositoryError> {
    use sqlx::Row;

    let value: i64 = row.get(column);
    u32::try_from(value)
        .map_err(|_| RepositoryError::Database(format!("{} out of range: {}", column, value)))
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

/// Unique constraint violations become `AlreadyExists`
fn conflict_or_db_err(e: sqlx::Error, what: String) -> RepositoryError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepositoryError::AlreadyExists(what);
        }
    }
    db_err(e)
}

#[async_trait]
impl GameRepository for SqliteGameRepository {
    async fn create_game(&self, code: &str) -> Result<Game, RepositoryError> {
        let result = sqlx::query("INSERT INTO games (code, started, current_round) VALUES (?, 0, 0)")
            .bind(code)
            .execute(&self.pool)
            .await
            .map_err(|e| conflict_or_db_err(e, format!("game code {}", code)))?;

        Ok(Game {
            id: result.last_insert_rowid(),
            code: code.to_string(),
            started: false,
            current_round: 0,
        })
    }

    async fn find_game_by_code(&self, code: &str) -> Result<Option<Game>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM games WHERE code = ?")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(Self::row_to_game).transpose()
    }

    async fn add_player(&self, game_id: i64, name: &str) -> Result<Player, RepositoryError> {
        let result = sqlx::query("INSERT INTO players (game_id, name) VALUES (?, ?)")
            .bind(game_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Player {
            id: result.last_insert_rowid(),
            game_id,
            name: name.to_string(),
            eliminated: false,
            votes: 0,
        })
    }

    async fn get_players(&self, game_id: i64) -> Result<Vec<Player>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM players WHERE game_id = ? ORDER BY id")
            .bind(game_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows.iter().map(Self::row_to_player).collect())
    }

    async fn eliminate_top_player(&self, game_id: i64) -> Result<Option<Player>, RepositoryError> {
        // Pick and mark in one statement, under one write lock
        let rows = sqlx::query(
            r#"
            UPDATE players SET eliminated = 1
            WHERE id = (
                SELECT id FROM players WHERE game_id = ?
                ORDER BY votes DESC, id ASC LIMIT 1
            )
            RETURNING *
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows.first().map(Self::row_to_player))
    }

    async fn open_round(
        &self,
        game_id: i64,
        from_round: u32,
        number: u32,
        question: &str,
        start_time: i64,
    ) -> Result<Option<Round>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Compare-and-set on current_round so two concurrent advances cannot both win
        let updated = sqlx::query(
            "UPDATE games SET started = 1, current_round = ? WHERE id = ? AND current_round = ?",
        )
        .bind(i64::from(number))
        .bind(game_id)
        .bind(i64::from(from_round))
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if updated.rows_affected() == 0 {
            tx.rollback().await.map_err(db_err)?;
            return Ok(None);
        }

        let result = sqlx::query(
            "INSERT INTO rounds (game_id, number, question, start_time, ended, finalized) VALUES (?, ?, ?, ?, 0, 0)",
        )
        .bind(game_id)
        .bind(i64::from(number))
        .bind(question)
        .bind(start_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_or_db_err(e, format!("round {} of game {}", number, game_id)))?;

        tx.commit().await.map_err(db_err)?;

        Ok(Some(Round {
            id: result.last_insert_rowid(),
            game_id,
            number,
            question: question.to_string(),
            start_time,
            ended: false,
            finalized: false,
        }))
    }

    async fn find_round(&self, game_id: i64, number: u32) -> Result<Option<Round>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM rounds WHERE game_id = ? AND number = ?")
            .bind(game_id)
            .bind(i64::from(number))
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(Self::row_to_round).transpose()
    }

    async fn mark_round_ended(&self, round_id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE rounds SET ended = 1 WHERE id = ? AND ended = 0")
            .bind(round_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn finalize_round(
        &self,
        game_id: i64,
        number: u32,
    ) -> Result<FinalizeOutcome, RepositoryError> {
        use sqlx::Row;

        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Opening with the write makes concurrent finalizers queue on the write lock
        let claimed = sqlx::query(
            r#"
            UPDATE rounds SET ended = 1, finalized = 1
            WHERE game_id = ? AND number = ? AND finalized = 0
            RETURNING id
            "#,
        )
        .bind(game_id)
        .bind(i64::from(number))
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        let Some(claimed) = claimed.first() else {
            let exists = sqlx::query("SELECT id FROM rounds WHERE game_id = ? AND number = ?")
                .bind(game_id)
                .bind(i64::from(number))
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_err)?;
            tx.rollback().await.map_err(db_err)?;

            return Ok(match exists {
                Some(_) => FinalizeOutcome::AlreadyFinalized,
                None => FinalizeOutcome::RoundMissing,
            });
        };
        let round_id: i64 = claimed.get("id");

        // Votes are credited to whoever wrote the answer they point at
        let rows = sqlx::query(
            r#"
            SELECT answers.player_id AS player_id, COUNT(votes.id) AS vote_count
            FROM votes
            JOIN answers ON votes.answer_id = answers.id
            WHERE answers.round_id = ?
            GROUP BY answers.player_id
            ORDER BY answers.player_id
            "#,
        )
        .bind(round_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_err)?;

        let tallies: Vec<VoteTally> = rows
            .iter()
            .map(|row| VoteTally {
                player_id: row.get("player_id"),
                votes: row.get("vote_count"),
            })
            .collect();

        for tally in &tallies {
            sqlx::query("UPDATE players SET votes = votes + ? WHERE id = ?")
                .bind(tally.votes)
                .bind(tally.player_id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;

        Ok(FinalizeOutcome::Finalized(tallies))
    }

    async fn add_answer(
        &self,
        round_id: i64,
        player_id: i64,
        text: &str,
    ) -> Result<Answer, RepositoryError> {
        let result = sqlx::query("INSERT INTO answers (round_id, player_id, text) VALUES (?, ?, ?)")
            .bind(round_id)
            .bind(player_id)
            .bind(text)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Answer {
            id: result.last_insert_rowid(),
            round_id,
            player_id,
            text: text.to_string(),
        })
    }

    async fn get_answers(&self, round_id: i64) -> Result<Vec<Answer>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM answers WHERE round_id = ? ORDER BY id")
            .bind(round_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(rows.iter().map(Self::row_to_answer).collect())
    }

    async fn add_vote(
        &self,
        round_id: i64,
        voter_id: i64,
        answer_id: i64,
    ) -> Result<Vote, RepositoryError> {
        let result = sqlx::query("INSERT INTO votes (round_id, voter_id, answer_id) VALUES (?, ?, ?)")
            .bind(round_id)
            .bind(voter_id)
            .bind(answer_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(Vote {
            id: result.last_insert_rowid(),
            round_id,
            voter_id,
            answer_id,
        })
    }
}
