use std::collections::HashSet;

use thiserror::Error;

use crate::model::{QuestionDraft, QuestionError, QuestionId, QuestionRecord};

const BUILTIN_QUESTIONS: &str = include_str!("../data/questions.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("duplicate question id: {0}")]
    DuplicateId(QuestionId),

    #[error("invalid question {id:?}: {source}")]
    InvalidQuestion {
        id: String,
        #[source]
        source: QuestionError,
    },

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable in-memory question bank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<QuestionRecord>,
}

impl QuestionCatalog {
    /// Build a catalog from validated records.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two records share an id.
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(CatalogError::DuplicateId(question.id().clone()));
            }
        }
        Ok(Self { questions })
    }

    /// Validate and load raw drafts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidQuestion` for the first malformed draft, or
    /// `CatalogError::DuplicateId` if ids collide.
    pub fn from_drafts(
        drafts: impl IntoIterator<Item = QuestionDraft>,
    ) -> Result<Self, CatalogError> {
        let questions = drafts
            .into_iter()
            .map(|draft| {
                let id = draft.id.clone();
                draft
                    .validate()
                    .map_err(|source| CatalogError::InvalidQuestion { id, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(questions)
    }

    /// Parse a JSON array of drafts.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON, otherwise the same errors
    /// as [`QuestionCatalog::from_drafts`].
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let drafts: Vec<QuestionDraft> = serde_json::from_str(raw)?;
        Self::from_drafts(drafts)
    }

    /// The question bank compiled into the binary.
    ///
    /// # Errors
    ///
    /// Propagates validation errors; the bundled data is covered by tests.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    #[must_use]
    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.id() == id)
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

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: &str, answer: &str) -> QuestionDraft {
        QuestionDraft {
            id: id.into(),
            category: "History".into(),
            prompt: format!("prompt {id}"),
            options: vec!["a".into(), "b".into()],
            answer: answer.into(),
            ..QuestionDraft::default()
        }
    }

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = QuestionCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 6);
        for question in catalog.questions() {
            assert!(!question.answer().is_empty());
            assert!(question.option_slots().len() <= crate::model::MAX_OPTION_SLOTS);
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err =
            QuestionCatalog::from_drafts(vec![draft("Q1", "a"), draft("Q1", "b")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id.as_str() == "Q1"));
    }

    #[test]
    fn rejects_question_without_answer() {
        let err =
            QuestionCatalog::from_drafts(vec![draft("Q1", "a"), draft("Q2", "")]).unwrap_err();
        match err {
            CatalogError::InvalidQuestion { id, source } => {
                assert_eq!(id, "Q2");
                assert_eq!(source, QuestionError::MissingAnswer);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn from_json_reads_drafts_with_missing_fields() {
        let raw = r#"[{"id": "Q9", "prompt": "p", "options": ["x", "y"], "answer": "x"}]"#;
        let catalog = QuestionCatalog::from_json(raw).unwrap();
        let id = QuestionId::new("Q9").unwrap();
        let question = catalog.get(&id).unwrap();
        assert_eq!(question.category(), "");
        assert_eq!(question.answer(), "x");
    }

    #[test]
    fn from_json_reports_parse_errors() {
        assert!(matches!(
            QuestionCatalog::from_json("{not json").unwrap_err(),
            CatalogError::Parse(_)
        ));
    }
}
