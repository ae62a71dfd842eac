use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PlayerId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: PlayerId,
    pub name: String,
    /// Sum of all prizes won, in prize units
    pub balance: u64,
    pub created_at: DateTime<Utc>,
}

impl Player {
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
            balance: 0,
            created_at: Utc::now(),
        }
    }
}
