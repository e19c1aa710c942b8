use std::fmt;

use thiserror::Error;

use crate::model::{Mistake, QuestionId, ScoreCard, Session, SessionQuestion};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RunnerError {
    #[error("no questions available for session")]
    EmptySession,

    #[error("current question was already answered")]
    AlreadyAnswered,

    #[error("no answer has been submitted for the current question")]
    NotAwaiting,

    #[error("session already completed")]
    Completed,

    #[error("{0:?} is not an option for the current question")]
    UnknownOption(String),

    #[error("option index {index} out of range (0..{len})")]
    OptionOutOfRange { index: usize, len: usize },
}

//
// ─── STATES ────────────────────────────────────────────────────────────────────
//

/// Observable lifecycle of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// First question shown, nothing answered yet.
    NotStarted,
    /// Waiting for an answer to the current question.
    InProgress,
    /// Current question answered; feedback is showing.
    AwaitingNext,
    Completed,
}

/// Feedback for the question that was just answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected: String,
    pub is_correct: bool,
}

/// Everything the outside world needs to know about one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub question_id: QuestionId,
    pub category: String,
    pub grade: String,
    pub subject: String,
    pub selected: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Result of moving past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the question at this position.
    Next(usize),
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Turn {
    Answering,
    Feedback(AnswerFeedback),
    Done,
}

//
// ─── RUNNER ────────────────────────────────────────────────────────────────────
//

/// Steps through a session one question at a time.
///
/// The cursor only moves forward. Each question takes exactly one answer,
/// followed by exactly one `advance`.
pub struct SessionRunner {
    session: Session,
    cursor: usize,
    turn: Turn,
    score: ScoreCard,
}

impl SessionRunner {
    /// # Errors
    ///
    /// Returns `RunnerError::EmptySession` if the session has no questions.
    pub fn new(session: Session) -> Result<Self, RunnerError> {
        if session.is_empty() {
            return Err(RunnerError::EmptySession);
        }
        Ok(Self {
            session,
            cursor: 0,
            turn: Turn::Answering,
            score: ScoreCard::default(),
        })
    }

    #[must_use]
    pub fn state(&self) -> RunnerState {
        match self.turn {
            Turn::Done => RunnerState::Completed,
            Turn::Feedback(_) => RunnerState::AwaitingNext,
            Turn::Answering if self.cursor == 0 => RunnerState::NotStarted,
            Turn::Answering => RunnerState::InProgress,
        }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Zero-based position of the current question.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.session.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.session.is_empty()
    }

    #[must_use]
    pub fn score(&self) -> &ScoreCard {
        &self.score
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.turn, Turn::Done)
    }

    /// The question currently on screen, `None` once completed.
    #[must_use]
    pub fn current(&self) -> Option<&SessionQuestion> {
        if self.is_complete() {
            return None;
        }
        self.session.questions().get(self.cursor)
    }

    #[must_use]
    pub fn feedback(&self) -> Option<&AnswerFeedback> {
        match &self.turn {
            Turn::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }

    /// Answer the current question with one of its display options.
    ///
    /// Correctness is decided on the canonical answer string, never on position.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::AlreadyAnswered` when feedback is already showing,
    /// `RunnerError::Completed` after the last question, and
    /// `RunnerError::UnknownOption` if `option` is not offered by the question.
    pub fn submit_answer(&mut self, option: &str) -> Result<AnswerOutcome, RunnerError> {
        match self.turn {
            Turn::Answering => {}
            Turn::Feedback(_) => return Err(RunnerError::AlreadyAnswered),
            Turn::Done => return Err(RunnerError::Completed),
        }

        let question = self
            .session
            .questions()
            .get(self.cursor)
            .ok_or(RunnerError::Completed)?;
        if !question.display_options().iter().any(|o| o == option) {
            return Err(RunnerError::UnknownOption(option.to_owned()));
        }

        let record = question.record();
        let is_correct = record.is_correct(option);
        let outcome = AnswerOutcome {
            question_id: record.id().clone(),
            category: record.category().to_owned(),
            grade: record.grade().to_owned(),
            subject: record.subject().to_owned(),
            selected: option.to_owned(),
            correct_answer: record.answer().to_owned(),
            is_correct,
        };

        if is_correct {
            self.score.correct += 1;
        } else {
            self.score.mistakes.push(Mistake {
                question_id: record.id().clone(),
                prompt: record.prompt().to_owned(),
                submitted: option.to_owned(),
                correct: record.answer().to_owned(),
            });
        }

        self.turn = Turn::Feedback(AnswerFeedback {
            selected: option.to_owned(),
            is_correct,
        });

        Ok(outcome)
    }

    /// Answer by position in the current question's display options.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::OptionOutOfRange` for a bad index, otherwise the same
    /// errors as [`SessionRunner::submit_answer`].
    pub fn submit_choice(&mut self, index: usize) -> Result<AnswerOutcome, RunnerError> {
        let option = {
            let question = self.current().ok_or(RunnerError::Completed)?;
            let options = question.display_options();
            options
                .get(index)
                .cloned()
                .ok_or(RunnerError::OptionOutOfRange {
                    index,
                    len: options.len(),
                })?
        };
        self.submit_answer(&option)
    }

    /// Leave the feedback for the current question.
    ///
    /// # Errors
    ///
    /// Returns `RunnerError::NotAwaiting` unless an answer was just submitted.
    pub fn advance(&mut self) -> Result<Advance, RunnerError> {
        if !matches!(self.turn, Turn::Feedback(_)) {
            return Err(RunnerError::NotAwaiting);
        }

        if self.cursor + 1 < self.session.len() {
            self.cursor += 1;
            self.turn = Turn::Answering;
            Ok(Advance::Next(self.cursor))
        } else {
            self.score.answered = self.session.len();
            self.turn = Turn::Done;
            Ok(Advance::Completed)
        }
    }
}

impl fmt::Debug for SessionRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionRunner")
            .field("questions_len", &self.session.len())
            .field("cursor", &self.cursor)
            .field("state", &self.state())
            .field("correct", &self.score.correct)
            .field("mistakes_len", &self.score.mistakes.len())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
