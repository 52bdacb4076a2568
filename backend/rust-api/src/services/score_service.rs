use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::score::{LeaderboardEntry, ScoreRecord};

/// Aggregate win/loss ledger. Performs no deduplication of its own: the
/// quiz flow resets the round immediately after recording, which is what
/// keeps each completed round down to exactly one `record_result` call.
pub struct ScoreService {
    db: SqlitePool,
}

impl ScoreService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get_score(&self, user_id: i64) -> Result<Option<ScoreRecord>> {
        sqlx::query_as::<_, ScoreRecord>(
            "SELECT user_id, victories, games_played FROM scores WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .context("Failed to query score record")
    }

    /// Records one completed round: creates the record on first
    /// completion, increments it afterwards.
    pub async fn record_result(&self, user_id: i64, won: bool) -> Result<()> {
        match self.get_score(user_id).await? {
            Some(record) => {
                let victories = record.victories + i64::from(won);
                let games_played = record.games_played + 1;
                sqlx::query("UPDATE scores SET victories = ?, games_played = ? WHERE user_id = ?")
                    .bind(victories)
                    .bind(games_played)
                    .bind(user_id)
                    .execute(&self.db)
                    .await
                    .context("Failed to update score record")?;
            }
            None => {
                sqlx::query("INSERT INTO scores(user_id, victories, games_played) VALUES(?, ?, ?)")
                    .bind(user_id)
                    .bind(i64::from(won))
                    .bind(1_i64)
                    .execute(&self.db)
                    .await
                    .context("Failed to insert score record")?;
            }
        }
        Ok(())
    }

    /// Win percentage rounded to two decimals; 0 before the first game.
    pub async fn winrate(&self, user_id: i64) -> Result<f64> {
        Ok(match self.get_score(user_id).await? {
            Some(record) if record.games_played > 0 => {
                let ratio = record.victories as f64 / record.games_played as f64;
                (ratio * 100.0 * 100.0).round() / 100.0
            }
            _ => 0.0,
        })
    }

    /// Full standings: victories first, fewer games breaking ties.
    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        sqlx::query_as::<_, LeaderboardEntry>(
            r#"
            SELECT user.username, scores.victories, scores.games_played
            FROM scores
            JOIN user ON scores.user_id = user.id
            ORDER BY scores.victories DESC, scores.games_played ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("Failed to query leaderboard")
    }
}
