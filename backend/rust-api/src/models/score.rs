use serde::{Deserialize, Serialize};

/// Aggregate per-user record in the `scores` table. `victories` never
/// exceeds `games_played`; the row is created on first round completion and
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScoreRecord {
    pub user_id: i64,
    pub victories: i64,
    pub games_played: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaderboardEntry {
    pub username: String,
    pub victories: i64,
    pub games_played: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    /// Running score of the round in progress.
    pub score: u32,
    pub victories: i64,
    pub games_played: i64,
    pub winrate: f64,
}
