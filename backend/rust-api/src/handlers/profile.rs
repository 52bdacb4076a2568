use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tower_sessions::Session;

use crate::{
    extractors::CurrentUser,
    handlers::quiz::{internal_error, load_round},
    models::score::ProfileResponse,
    services::{score_service::ScoreService, AppState},
};

/// GET /api/v1/profile - the signed-in user's running score and record
pub async fn profile(
    CurrentUser(user): CurrentUser,
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let round = load_round(&session).await?;

    let ledger = ScoreService::new(state.db.clone());
    let record = ledger
        .get_score(user.user_id)
        .await
        .map_err(internal_error)?;
    let winrate = ledger.winrate(user.user_id).await.map_err(internal_error)?;

    let (victories, games_played) = record
        .map(|r| (r.victories, r.games_played))
        .unwrap_or((0, 0));

    Ok(Json(ProfileResponse {
        username: user.username,
        score: round.score,
        victories,
        games_played,
        winrate,
    }))
}

/// GET /api/v1/leaderboard - standings across all players
pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let ledger = ScoreService::new(state.db.clone());

    match ledger.leaderboard().await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => {
            tracing::error!("Failed to load leaderboard: {}", e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}
