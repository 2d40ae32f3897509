use serde::{Deserialize, Serialize};

use crate::domain::services::seconds_left;

/// Round entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: i64,
    pub game_id: i64,
    /// 1-based, unique per game
    pub number: u32,
    pub question: String,
    /// Unix timestamp (seconds) when the round opened
    pub start_time: i64,
    /// Set once answers are closed; never reverts
    pub ended: bool,
    /// Set once votes have been added to player tallies
    pub finalized: bool,
}

impl Round {
    /// Seconds remaining on this round's timer at `now`
    pub fn time_left(&self, duration_secs: i64, now: i64) -> i64 {
        seconds_left(self.start_time, duration_secs, now)
    }

    /// True when the timer has run out but the row has not been sealed yet
    pub fn needs_expiry(&self, duration_secs: i64, now: i64) -> bool {
        !self.ended && self.time_left(duration_secs, now) == 0
    }

    pub fn accepts_answers(&self) -> bool {
        !self.ended
    }

    pub fn accepts_votes(&self) -> bool {
        self.ended
    }
}

/// Result of sealing a round and folding its votes into player tallies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// No round with that number exists for the game
    RoundMissing,
    /// Tallies were already applied; nothing changed
    AlreadyFinalized,
    /// Tallies applied, one entry per player that received votes
    Finalized(Vec<VoteTally>),
}

/// Votes received by one player's answers in one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VoteTally {
    pub player_id: i64,
    pub votes: i64,
}
