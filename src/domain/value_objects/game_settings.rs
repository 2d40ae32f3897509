use serde::{Deserialize, Serialize};

/// Built-in prompts used when no question file is configured
pub const DEFAULT_QUESTIONS: [&str; 3] = [
    "What is the capital of France?",
    "Name a programming language that starts with P.",
    "What year did the first moon landing occur?",
];

/// Game rules shared by every game on this server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Ordered prompts; round n uses entry (n - 1) mod len
    pub questions: Vec<String>,
    /// Answer window per round, in seconds (default 60)
    pub round_duration_secs: i64,
    /// Rounds before elimination (default 3)
    pub total_rounds: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            questions: DEFAULT_QUESTIONS.iter().map(|q| q.to_string()).collect(),
            round_duration_secs: 60,
            total_rounds: 3,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.questions.is_empty() {
            return Err("At least one question is required");
        }
        if self.questions.iter().any(|q| q.trim().is_empty()) {
            return Err("Questions must not be blank");
        }
        if self.round_duration_secs <= 0 {
            return Err("Round duration must be positive");
        }
        if self.total_rounds == 0 {
            return Err("Total rounds must be at least 1");
        }
        Ok(())
    }
}
