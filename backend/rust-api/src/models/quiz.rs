use serde::{Deserialize, Serialize};

/// Per-user round state, read and written within a single request.
///
/// Invariants: `score <= questions_done.len() <= TOTAL_QUESTIONS`, entries
/// of `questions_done` are unique, and the currently presented question is
/// never one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub score: u32,
    pub questions_done: Vec<String>,
    pub current_question: Option<String>,
    pub current_options: Vec<String>,
}

impl RoundState {
    /// Progress is the number of correctly answered questions, not the
    /// number of submissions.
    pub fn progress(&self) -> usize {
        self.questions_done.len()
    }

    pub fn reset(&mut self) {
        *self = RoundState::default();
    }
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub answer: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub question: String,
    pub options: Vec<String>,
    pub score: u32,
    pub progress: usize,
    pub total: usize,
    pub narration: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
    pub feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    pub score: u32,
    pub progress: usize,
    pub total: usize,
    pub narration: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundOutcome {
    Win,
    Loss,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoundResultResponse {
    pub outcome: RoundOutcome,
    pub username: String,
    pub score: u32,
}
