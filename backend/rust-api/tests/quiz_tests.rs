mod common;

use axum::http::StatusCode;
use common::{body_json, location, TestClient};
use geoquiz_api::services::question_bank::{QuestionBank, TOTAL_QUESTIONS};
use serde_json::json;

async fn ready_client(username: &str) -> TestClient {
    let mut client = TestClient::spawn().await;
    client.grant_access().await;
    client.register(username).await;
    client
}

/// Fetches the current question and answers it correctly, returning the
/// reported progress.
async fn answer_correctly(client: &mut TestClient) -> u64 {
    let response = client.get("/api/v1/quiz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let question = body_json(response).await;

    let text = question["question"].as_str().unwrap();
    let answer = QuestionBank::answer_for(text).expect("question not in the bank");

    let options = question["options"].as_array().unwrap();
    assert_eq!(options.len(), 3);
    assert!(options.iter().any(|o| o == answer));

    let response = client
        .post("/api/v1/quiz/answer", json!({ "answer": answer }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let feedback = body_json(response).await;
    assert_eq!(feedback["correct"], true);
    assert!(feedback["correct_answer"].is_null());

    feedback["progress"].as_u64().unwrap()
}

#[tokio::test]
async fn a_perfect_round_ends_in_victory_and_is_recorded() {
    let mut client = ready_client("marie").await;

    for turn in 1..=TOTAL_QUESTIONS as u64 {
        let progress = answer_correctly(&mut client).await;
        assert_eq!(progress, turn);
    }

    // The round is over: the quiz redirects to the victory endpoint.
    let response = client.get("/api/v1/quiz").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/quiz/victory");

    let response = client.get("/api/v1/quiz/victory").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["outcome"], "win");
    assert_eq!(json["score"], TOTAL_QUESTIONS as u64);

    let response = client.get("/api/v1/profile").await;
    let json = body_json(response).await;
    assert_eq!(json["victories"], 1);
    assert_eq!(json["games_played"], 1);
    assert_eq!(json["winrate"], 100.0);
    // The round itself was reset.
    assert_eq!(json["score"], 0);

    // Revisiting the terminal endpoint cannot record a second victory.
    let response = client.get("/api/v1/quiz/victory").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/quiz");

    let response = client.get("/api/v1/profile").await;
    let json = body_json(response).await;
    assert_eq!(json["games_played"], 1);
}

#[tokio::test]
async fn a_wrong_answer_does_not_advance_the_round() {
    let mut client = ready_client("marie").await;

    let response = client.get("/api/v1/quiz").await;
    let question = body_json(response).await;
    let text = question["question"].as_str().unwrap().to_string();

    let response = client
        .post("/api/v1/quiz/answer", json!({ "answer": "zzzz" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let feedback = body_json(response).await;

    assert_eq!(feedback["correct"], false);
    assert_eq!(feedback["score"], 0);
    assert_eq!(feedback["progress"], 0);
    // The canonical answer is revealed on failure.
    assert_eq!(
        feedback["correct_answer"].as_str().unwrap(),
        QuestionBank::answer_for(&text).unwrap()
    );

    let response = client.get("/api/v1/profile").await;
    let json = body_json(response).await;
    assert_eq!(json["score"], 0);
}

#[tokio::test]
async fn an_empty_answer_is_simply_wrong() {
    let mut client = ready_client("marie").await;
    client.get("/api/v1/quiz").await;

    let response = client.post("/api/v1/quiz/answer", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let feedback = body_json(response).await;
    assert_eq!(feedback["correct"], false);
}

#[tokio::test]
async fn answering_without_a_question_redirects_into_the_quiz() {
    let mut client = ready_client("marie").await;

    let response = client
        .post("/api/v1/quiz/answer", json!({ "answer": "La Pangée" }))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/quiz");
}

#[tokio::test]
async fn terminal_pages_redirect_while_the_round_is_unfinished() {
    let mut client = ready_client("marie").await;
    answer_correctly(&mut client).await;

    let response = client.get("/api/v1/quiz/victory").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/quiz");

    let response = client.get("/api/v1/quiz/lose").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/quiz");
}

#[tokio::test]
async fn retry_abandons_progress_without_touching_the_ledger() {
    let mut client = ready_client("marie").await;
    let progress = answer_correctly(&mut client).await;
    assert_eq!(progress, 1);

    let response = client.get("/api/v1/quiz/retry").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/api/v1/quiz");

    let response = client.get("/api/v1/profile").await;
    let json = body_json(response).await;
    assert_eq!(json["score"], 0);
    assert_eq!(json["games_played"], 0);
}

#[tokio::test]
async fn narration_follows_progress() {
    let mut client = ready_client("marie").await;

    let response = client.get("/api/v1/quiz").await;
    let question = body_json(response).await;
    // Before the first correct answer, the intro line is shown.
    assert_eq!(
        question["narration"].as_str().unwrap(),
        QuestionBank::narration_line(0)
    );

    let text = question["question"].as_str().unwrap();
    let answer = QuestionBank::answer_for(text).unwrap();
    let response = client
        .post("/api/v1/quiz/answer", json!({ "answer": answer }))
        .await;
    let feedback = body_json(response).await;
    assert_eq!(
        feedback["narration"].as_str().unwrap(),
        QuestionBank::narration_line(1)
    );
}

#[tokio::test]
async fn a_new_round_starts_after_victory() {
    let mut client = ready_client("marie").await;

    for _ in 0..TOTAL_QUESTIONS {
        answer_correctly(&mut client).await;
    }
    client.get("/api/v1/quiz/victory").await;

    let response = client.get("/api/v1/quiz").await;
    assert_eq!(response.status(), StatusCode::OK);
    let question = body_json(response).await;
    assert_eq!(question["progress"], 0);
    assert_eq!(question["score"], 0);
}
