use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::model::ids::QuestionId;

/// Maximum number of option slots a question may carry.
pub const MAX_OPTION_SLOTS: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("correct answer cannot be empty")]
    MissingAnswer,

    #[error("too many option slots: {len} (max {})", MAX_OPTION_SLOTS)]
    TooManyOptions { len: usize },

    #[error("too many distractors: {len} (max {})", MAX_OPTION_SLOTS - 1)]
    TooManyDistractors { len: usize },

    #[error("invalid media reference: {raw}")]
    InvalidMedia { raw: String },
}

//
// ─── DRAFT ─────────────────────────────────────────────────────────────────────
//

/// Unvalidated question as it appears in a catalog source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionDraft {
    pub id: String,
    pub category: String,
    pub grade: String,
    pub subject: String,
    pub prompt: String,
    pub supplement: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub options: Vec<String>,
    pub answer: String,
    pub note: Option<String>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `QuestionRecord`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the id, prompt or answer is empty, when there are
    /// more than `MAX_OPTION_SLOTS` slots, when the answer plus its distinct distractors
    /// would not fit in `MAX_OPTION_SLOTS`, or when a media reference is not a URL.
    pub fn validate(self) -> Result<QuestionRecord, QuestionError> {
        let id = QuestionId::new(self.id).map_err(|_| QuestionError::EmptyId)?;

        let prompt = self.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if self.options.len() > MAX_OPTION_SLOTS {
            return Err(QuestionError::TooManyOptions {
                len: self.options.len(),
            });
        }

        let answer = self.answer.trim().to_owned();
        if answer.is_empty() {
            return Err(QuestionError::MissingAnswer);
        }

        let record = QuestionRecord {
            id,
            category: self.category.trim().to_owned(),
            grade: self.grade.trim().to_owned(),
            subject: self.subject.trim().to_owned(),
            prompt,
            supplement: non_empty(self.supplement),
            image: parse_media(self.image_url)?,
            video: parse_media(self.video_url)?,
            options: self.options.into_iter().map(|o| o.trim().to_owned()).collect(),
            answer,
            note: non_empty(self.note),
        };

        let distractors = record.distractors().len();
        if distractors >= MAX_OPTION_SLOTS {
            return Err(QuestionError::TooManyDistractors { len: distractors });
        }
        Ok(record)
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

fn parse_media(raw: Option<String>) -> Result<Option<Url>, QuestionError> {
    let Some(raw) = non_empty(raw) else {
        return Ok(None);
    };
    Url::parse(&raw)
        .map(Some)
        .map_err(|_| QuestionError::InvalidMedia { raw })
}

//
// ─── RECORD ────────────────────────────────────────────────────────────────────
//

/// An immutable, validated question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    id: QuestionId,
    category: String,
    grade: String,
    subject: String,
    prompt: String,
    supplement: Option<String>,
    image: Option<Url>,
    video: Option<Url>,
    options: Vec<String>,
    answer: String,
    note: Option<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn grade(&self) -> &str {
        &self.grade
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn supplement(&self) -> Option<&str> {
        self.supplement.as_deref()
    }

    #[must_use]
    pub fn image(&self) -> Option<&Url> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn video(&self) -> Option<&Url> {
        self.video.as_ref()
    }

    /// Raw option slots, including unused (empty) ones.
    #[must_use]
    pub fn option_slots(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Non-empty option slots other than the correct answer, in slot order.
    ///
    /// Repeated slot values are kept once so no option is shown twice.
    #[must_use]
    pub fn distractors(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.options.len());
        for option in &self.options {
            let option = option.as_str();
            if option.is_empty() || option == self.answer || out.contains(&option) {
                continue;
            }
            out.push(option);
        }
        out
    }

    /// Whether `candidate` is the canonical correct answer.
    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        candidate == self.answer
    }
}
