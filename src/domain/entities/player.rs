use serde::{Deserialize, Serialize};

/// Player entity - a named participant in one game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: i64,
    pub game_id: i64,
    pub name: String,
    pub eliminated: bool,
    /// Cumulative votes received across finalized rounds
    pub votes: i64,
}
