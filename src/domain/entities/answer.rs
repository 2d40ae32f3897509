use serde::{Deserialize, Serialize};

/// Answer entity - immutable once submitted
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: i64,
    pub round_id: i64,
    pub player_id: i64,
    pub text: String,
}
