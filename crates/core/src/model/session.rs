use thiserror::Error;

use crate::model::{QuestionId, QuestionRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSettingsError {
    #[error("session size must be > 0")]
    InvalidMaxQuestions,
}

/// Knobs for building a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    max_questions: usize,
}

impl SessionSettings {
    pub const DEFAULT_MAX_QUESTIONS: usize = 5;

    /// Creates settings with a custom session size.
    ///
    /// # Errors
    ///
    /// Returns `SessionSettingsError::InvalidMaxQuestions` if `max_questions` is zero.
    pub fn new(max_questions: usize) -> Result<Self, SessionSettingsError> {
        if max_questions == 0 {
            return Err(SessionSettingsError::InvalidMaxQuestions);
        }
        Ok(Self { max_questions })
    }

    #[must_use]
    pub fn max_questions(&self) -> usize {
        self.max_questions
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_questions: Self::DEFAULT_MAX_QUESTIONS,
        }
    }
}

/// A question as presented in one session, with its options in display order.
///
/// The order is fixed when the session is built and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    record: QuestionRecord,
    display_options: Vec<String>,
}

impl SessionQuestion {
    pub(crate) fn new(record: QuestionRecord, display_options: Vec<String>) -> Self {
        Self {
            record,
            display_options,
        }
    }

    #[must_use]
    pub fn record(&self) -> &QuestionRecord {
        &self.record
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        self.record.id()
    }

    #[must_use]
    pub fn display_options(&self) -> &[String] {
        &self.display_options
    }
}

/// Ordered questions picked for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    questions: Vec<SessionQuestion>,
}

impl Session {
    pub(crate) fn new(questions: Vec<SessionQuestion>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// A wrong answer recorded during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mistake {
    pub question_id: QuestionId,
    pub prompt: String,
    pub submitted: String,
    pub correct: String,
}

/// Running score for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreCard {
    pub correct: usize,
    pub answered: usize,
    pub mistakes: Vec<Mistake>,
}
