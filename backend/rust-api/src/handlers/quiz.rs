use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::{
    extractors::{AppJson, CurrentUser, SESSION_ROUND_KEY},
    handlers::auth::session_error,
    metrics,
    models::quiz::{
        QuestionResponse, RoundOutcome, RoundResultResponse, RoundState, SubmitAnswerRequest,
        SubmitAnswerResponse,
    },
    services::{
        question_bank::{QuestionBank, TOTAL_QUESTIONS},
        quiz_service::{QuizError, QuizService, RoundStep},
        score_service::ScoreService,
        AppState,
    },
};

/// GET /api/v1/quiz - present a question for the round in progress; a
/// finished round 303s to its terminal endpoint.
pub async fn next_question(
    CurrentUser(user): CurrentUser,
    session: Session,
) -> Result<Response, (StatusCode, String)> {
    let mut round = load_round(&session).await?;

    match QuizService::deal_question(&mut round) {
        Ok(RoundStep::Finished(RoundOutcome::Win)) => {
            Ok(Redirect::to("/api/v1/quiz/victory").into_response())
        }
        Ok(RoundStep::Finished(RoundOutcome::Loss)) => {
            Ok(Redirect::to("/api/v1/quiz/lose").into_response())
        }
        Ok(RoundStep::Question { text, options }) => {
            store_round(&session, &round).await?;
            let progress = round.progress();
            Ok(Json(QuestionResponse {
                question: text,
                options,
                score: round.score,
                progress,
                total: TOTAL_QUESTIONS,
                narration: QuestionBank::narration_line(progress).to_string(),
            })
            .into_response())
        }
        Err(e) => {
            tracing::error!("Failed to deal question for {}: {}", user.username, e);
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// POST /api/v1/quiz/answer - evaluate a submission against the question
/// on the table. A missing answer field simply does not match.
pub async fn submit_answer(
    CurrentUser(user): CurrentUser,
    session: Session,
    AppJson(req): AppJson<SubmitAnswerRequest>,
) -> Result<Response, (StatusCode, String)> {
    let mut round = load_round(&session).await?;
    let submitted = req.answer.as_deref().unwrap_or("");

    match QuizService::submit_answer(&mut round, submitted) {
        Ok(feedback) => {
            store_round(&session, &round).await?;
            metrics::record_answer(feedback.correct);
            tracing::info!(
                username = %user.username,
                correct = feedback.correct,
                progress = feedback.progress,
                "Answer processed"
            );

            let narration = QuestionBank::narration_line(feedback.progress).to_string();
            let response = if feedback.correct {
                SubmitAnswerResponse {
                    correct: true,
                    feedback: "✔️ Bonne réponse !".to_string(),
                    correct_answer: None,
                    score: feedback.score,
                    progress: feedback.progress,
                    total: TOTAL_QUESTIONS,
                    narration,
                }
            } else {
                SubmitAnswerResponse {
                    correct: false,
                    feedback: format!(
                        "❌ Mauvaise réponse. La bonne réponse était : {}",
                        feedback.correct_answer
                    ),
                    correct_answer: Some(feedback.correct_answer),
                    score: feedback.score,
                    progress: feedback.progress,
                    total: TOTAL_QUESTIONS,
                    narration,
                }
            };
            Ok(Json(response).into_response())
        }
        // No question on the table: send the client back to pick one up.
        Err(QuizError::InvalidRoundState) => Ok(Redirect::to("/api/v1/quiz").into_response()),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}

/// GET /api/v1/quiz/victory - terminal endpoint for a perfect round:
/// records the win, then resets the round so a refresh cannot recount it.
pub async fn victory(
    CurrentUser(user): CurrentUser,
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Response, (StatusCode, String)> {
    let mut round = load_round(&session).await?;

    if QuizService::outcome(&round) != Some(RoundOutcome::Win) {
        return Ok(Redirect::to("/api/v1/quiz").into_response());
    }

    let ledger = ScoreService::new(state.db.clone());
    ledger
        .record_result(user.user_id, true)
        .await
        .map_err(internal_error)?;
    metrics::record_round("win");
    tracing::info!(username = %user.username, "Round won");

    QuizService::reset(&mut round);
    store_round(&session, &round).await?;

    Ok(Json(RoundResultResponse {
        outcome: RoundOutcome::Win,
        username: user.username,
        score: TOTAL_QUESTIONS as u32,
    })
    .into_response())
}

/// GET /api/v1/quiz/lose - terminal endpoint for a failed round.
pub async fn lose(
    CurrentUser(user): CurrentUser,
    session: Session,
    State(state): State<Arc<AppState>>,
) -> Result<Response, (StatusCode, String)> {
    let mut round = load_round(&session).await?;

    if QuizService::outcome(&round) != Some(RoundOutcome::Loss) {
        return Ok(Redirect::to("/api/v1/quiz").into_response());
    }

    let ledger = ScoreService::new(state.db.clone());
    ledger
        .record_result(user.user_id, false)
        .await
        .map_err(internal_error)?;
    metrics::record_round("loss");
    tracing::info!(username = %user.username, score = round.score, "Round lost");

    let final_score = round.score;
    QuizService::reset(&mut round);
    store_round(&session, &round).await?;

    Ok(Json(RoundResultResponse {
        outcome: RoundOutcome::Loss,
        username: user.username,
        score: final_score,
    })
    .into_response())
}

/// GET /api/v1/quiz/retry - abandon the round; the ledger is untouched.
pub async fn retry(
    CurrentUser(_user): CurrentUser,
    session: Session,
) -> Result<Response, (StatusCode, String)> {
    let mut round = load_round(&session).await?;
    QuizService::reset(&mut round);
    store_round(&session, &round).await?;
    Ok(Redirect::to("/api/v1/quiz").into_response())
}

pub(crate) async fn load_round(session: &Session) -> Result<RoundState, (StatusCode, String)> {
    Ok(session
        .get::<RoundState>(SESSION_ROUND_KEY)
        .await
        .map_err(session_error)?
        .unwrap_or_default())
}

pub(crate) async fn store_round(
    session: &Session,
    round: &RoundState,
) -> Result<(), (StatusCode, String)> {
    session
        .insert(SESSION_ROUND_KEY, round)
        .await
        .map_err(session_error)
}

pub(crate) fn internal_error(e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!("Internal error: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
