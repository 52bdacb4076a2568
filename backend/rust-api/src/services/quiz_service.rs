use thiserror::Error;

use super::answer_service;
use super::question_bank::{QuestionBank, TOTAL_QUESTIONS};
use crate::models::quiz::{RoundOutcome, RoundState};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("no questions remaining in the bank")]
    NoQuestionsRemaining,
    #[error("round state does not allow this operation")]
    InvalidRoundState,
}

/// What the round looks like after a start/resume: either a question on
/// the table, or a terminal outcome.
#[derive(Debug, PartialEq, Eq)]
pub enum RoundStep {
    Question { text: String, options: Vec<String> },
    Finished(RoundOutcome),
}

#[derive(Debug)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
    pub score: u32,
    pub progress: usize,
}

/// The round state machine. All transitions mutate a [`RoundState`] held
/// in the caller's session; persistence is the caller's concern.
pub struct QuizService;

impl QuizService {
    /// Terminal outcome, once five distinct questions have been answered:
    /// a win requires a perfect score.
    pub fn outcome(round: &RoundState) -> Option<RoundOutcome> {
        if round.progress() < TOTAL_QUESTIONS {
            return None;
        }
        if round.score as usize == TOTAL_QUESTIONS {
            Some(RoundOutcome::Win)
        } else {
            Some(RoundOutcome::Loss)
        }
    }

    /// Starts or resumes the round: routes a finished round to its
    /// terminal state, otherwise deals a fresh unseen question together
    /// with its shuffled 3-option set into the state.
    pub fn deal_question(round: &mut RoundState) -> Result<RoundStep, QuizError> {
        if let Some(outcome) = Self::outcome(round) {
            return Ok(RoundStep::Finished(outcome));
        }

        let (question, answer) = QuestionBank::pick_question(&round.questions_done)?;
        let options = QuestionBank::build_options(answer);

        round.current_question = Some(question.to_string());
        round.current_options = options.clone();

        Ok(RoundStep::Question {
            text: question.to_string(),
            options,
        })
    }

    /// Evaluates a submission against the currently presented question.
    ///
    /// A correct answer bumps the score, marks the question done and takes
    /// it off the table. A wrong answer changes nothing: the question is
    /// not consumed and may be retried or re-dealt later.
    pub fn submit_answer(
        round: &mut RoundState,
        submitted: &str,
    ) -> Result<AnswerFeedback, QuizError> {
        let question = round
            .current_question
            .clone()
            .ok_or(QuizError::InvalidRoundState)?;
        let correct_answer =
            QuestionBank::answer_for(&question).ok_or(QuizError::InvalidRoundState)?;

        let correct = answer_service::answers_match(submitted, correct_answer);
        if correct {
            round.score += 1;
            round.questions_done.push(question);
            round.current_question = None;
            round.current_options.clear();
        }

        Ok(AnswerFeedback {
            correct,
            correct_answer: correct_answer.to_string(),
            score: round.score,
            progress: round.progress(),
        })
    }

    /// Abandons the current progress; the ledger is untouched.
    pub fn reset(round: &mut RoundState) {
        round.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented_round() -> RoundState {
        let mut round = RoundState::default();
        match QuizService::deal_question(&mut round).unwrap() {
            RoundStep::Question { .. } => round,
            RoundStep::Finished(_) => unreachable!("fresh round cannot be finished"),
        }
    }

    #[test]
    fn fresh_round_has_no_outcome() {
        assert_eq!(QuizService::outcome(&RoundState::default()), None);
    }

    #[test]
    fn win_requires_a_perfect_score() {
        let done: Vec<String> = (0..TOTAL_QUESTIONS).map(|i| format!("q{i}")).collect();

        let won = RoundState {
            score: TOTAL_QUESTIONS as u32,
            questions_done: done.clone(),
            ..RoundState::default()
        };
        assert_eq!(QuizService::outcome(&won), Some(RoundOutcome::Win));

        let lost = RoundState {
            score: 3,
            questions_done: done,
            ..RoundState::default()
        };
        assert_eq!(QuizService::outcome(&lost), Some(RoundOutcome::Loss));
    }

    #[test]
    fn deal_question_presents_an_unseen_question() {
        let round = presented_round();
        let question = round.current_question.as_deref().unwrap();

        assert!(!round.questions_done.iter().any(|d| d == question));
        assert_eq!(round.current_options.len(), 3);
        let answer = QuestionBank::answer_for(question).unwrap();
        assert!(round.current_options.iter().any(|o| o == answer));
    }

    #[test]
    fn correct_answer_advances_score_and_progress_together() {
        let mut round = presented_round();
        let question = round.current_question.clone().unwrap();
        let answer = QuestionBank::answer_for(&question).unwrap();

        let feedback = QuizService::submit_answer(&mut round, answer).unwrap();

        assert!(feedback.correct);
        assert_eq!(feedback.score, 1);
        assert_eq!(feedback.progress, 1);
        assert_eq!(round.questions_done, vec![question]);
        // The answered question leaves the table.
        assert_eq!(round.current_question, None);
        assert!(round.current_options.is_empty());
    }

    #[test]
    fn wrong_answer_changes_nothing() {
        let mut round = presented_round();
        let question = round.current_question.clone().unwrap();

        let feedback = QuizService::submit_answer(&mut round, "zzzz").unwrap();

        assert!(!feedback.correct);
        assert_eq!(feedback.score, 0);
        assert_eq!(feedback.progress, 0);
        assert!(round.questions_done.is_empty());
        // The question stays presented for a retry.
        assert_eq!(round.current_question.as_deref(), Some(question.as_str()));
        assert_eq!(
            feedback.correct_answer,
            QuestionBank::answer_for(&question).unwrap()
        );
    }

    #[test]
    fn empty_submission_counts_as_wrong() {
        let mut round = presented_round();
        let feedback = QuizService::submit_answer(&mut round, "").unwrap();
        assert!(!feedback.correct);
    }

    #[test]
    fn submitting_without_a_presented_question_is_rejected() {
        let mut round = RoundState::default();
        assert_eq!(
            QuizService::submit_answer(&mut round, "La Pangée").unwrap_err(),
            QuizError::InvalidRoundState
        );
    }

    #[test]
    fn a_full_round_of_correct_answers_ends_in_a_win() {
        let mut round = RoundState::default();

        for turn in 1..=TOTAL_QUESTIONS {
            let step = QuizService::deal_question(&mut round).unwrap();
            let question = match step {
                RoundStep::Question { text, .. } => text,
                RoundStep::Finished(_) => panic!("round finished after {turn} questions"),
            };
            let answer = QuestionBank::answer_for(&question).unwrap();
            let feedback = QuizService::submit_answer(&mut round, answer).unwrap();
            assert!(feedback.correct);
            assert_eq!(feedback.progress, turn);
        }

        assert_eq!(
            QuizService::deal_question(&mut round).unwrap(),
            RoundStep::Finished(RoundOutcome::Win)
        );

        QuizService::reset(&mut round);
        assert_eq!(round, RoundState::default());
    }
}
