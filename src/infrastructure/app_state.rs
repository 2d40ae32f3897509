use std::sync::Arc;

use crate::domain::services::Clock;
use crate::domain::value_objects::GameSettings;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::repositories::SqliteGameRepository;
use crate::infrastructure::database::{connect_pool, init_schema};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Game repository
    pub game_repo: Arc<SqliteGameRepository>,

    /// Question list, round timer and game length
    pub settings: Arc<GameSettings>,

    /// Time source for round timers
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Connect to the database, create the schema and wire up repositories
    pub async fn new(config: &AppConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        let db = connect_pool(&config.database_url, config.max_connections).await?;
        init_schema(&db).await?;

        let game_repo = Arc::new(SqliteGameRepository::new(db));

        tracing::info!(
            "Game settings: {} questions, {}s rounds, {} rounds per game",
            config.settings.questions.len(),
            config.settings.round_duration_secs,
            config.settings.total_rounds
        );

        Ok(Self {
            game_repo,
            settings: Arc::new(config.settings.clone()),
            clock,
        })
    }
}
