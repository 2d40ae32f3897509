use sqlx::SqlitePool;

/// Table and index definitions. Safe to run on every startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS games (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        code TEXT NOT NULL UNIQUE,
        started INTEGER NOT NULL DEFAULT 0,
        current_round INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        eliminated INTEGER NOT NULL DEFAULT 0,
        votes INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rounds (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        game_id INTEGER NOT NULL,
        number INTEGER NOT NULL,
        question TEXT NOT NULL,
        start_time INTEGER NOT NULL,
        ended INTEGER NOT NULL DEFAULT 0,
        finalized INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS answers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        round_id INTEGER NOT NULL,
        player_id INTEGER NOT NULL,
        text TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS votes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        round_id INTEGER NOT NULL,
        voter_id INTEGER NOT NULL,
        answer_id INTEGER NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_rounds_game_number ON rounds (game_id, number)",
    "CREATE INDEX IF NOT EXISTS idx_players_game ON players (game_id)",
    "CREATE INDEX IF NOT EXISTS idx_answers_round ON answers (round_id)",
    "CREATE INDEX IF NOT EXISTS idx_votes_answer ON votes (answer_id)",
];

/// Create all tables and indexes that do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    tracing::debug!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
