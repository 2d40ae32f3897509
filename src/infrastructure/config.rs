//! Runtime configuration read from the environment (and `.env` via dotenvy).

use std::path::Path;

use crate::domain::value_objects::GameSettings;

const DEFAULT_DATABASE_URL: &str = "sqlite:./data/fibble.db";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Server configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub max_connections: u32,
    pub settings: GameSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            settings: GameSettings::default(),
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading from an arbitrary source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = GameSettings::default();

        // Get database path, ensure it has the sqlite: prefix
        let db_path = lookup("DATABASE_URL")
            .or_else(|| lookup("DB_PATH"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let database_url = if db_path.starts_with("sqlite:") {
            db_path
        } else {
            format!("sqlite:{}", db_path)
        };

        let port = parse_or(&lookup, "PORT", DEFAULT_PORT);
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS);

        let round_duration_secs = parse_or(&lookup, "ROUND_DURATION_SECS", defaults.round_duration_secs);
        let total_rounds = parse_or(&lookup, "TOTAL_ROUNDS", defaults.total_rounds);

        let questions = match lookup("QUESTIONS_FILE") {
            Some(path) => load_questions(Path::new(&path)).unwrap_or(defaults.questions.clone()),
            None => defaults.questions.clone(),
        };

        let mut settings = GameSettings {
            questions,
            round_duration_secs,
            total_rounds,
        };
        if let Err(reason) = settings.validate() {
            tracing::warn!("Invalid game settings ({}), using defaults", reason);
            settings = defaults;
        }

        Self {
            database_url,
            port,
            max_connections,
            settings,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparsable {}={:?}", key, raw);
                default
            }
        },
        None => default,
    }
}

/// Read a JSON array of question strings. `None` means "use the built-in list".
fn load_questions(path: &Path) -> Option<Vec<String>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "question file not found; using built-in questions");
            return None;
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to read question file");
            return None;
        }
    };

    match serde_json::from_str::<Vec<String>>(&contents) {
        Ok(questions) if !questions.is_empty() => {
            tracing::info!(path = %path.display(), count = questions.len(), "loaded questions");
            Some(questions)
        }
        Ok(_) => {
            tracing::warn!(path = %path.display(), "question file is empty; using built-in questions");
            None
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "failed to parse question file");
            None
        }
    }
}
