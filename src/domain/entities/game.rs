use serde::{Deserialize, Serialize};

/// Game entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: i64,
    pub code: String,
    pub started: bool,
    pub current_round: u32,
}

impl Game {
    /// Players may only join while the lobby is open
    pub fn can_join(&self) -> bool {
        !self.started
    }

    /// Number of the round that follows the current one
    pub fn next_round_number(&self) -> u32 {
        self.current_round + 1
    }
}

/// Generate a random 4-letter uppercase join code
pub fn generate_join_code<R: rand::Rng + ?Sized>(rng: &mut R) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    (0..JOIN_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Length of a join code
pub const JOIN_CODE_LENGTH: usize = 4;
