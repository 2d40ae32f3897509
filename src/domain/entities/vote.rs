use serde::{Deserialize, Serialize};

/// Vote entity - one voter picking one answer in a round
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: i64,
    pub round_id: i64,
    pub voter_id: i64,
    pub answer_id: i64,
}
