use rand::Rng;
use rand::seq::SliceRandom;

use crate::model::{QuestionRecord, Session, SessionQuestion, SessionSettings};

/// Builds a randomized, size-bounded session from a filtered subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionBuilder {
    settings: SessionSettings,
}

impl SessionBuilder {
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    /// Build a session from the filtered subset.
    ///
    /// - The subset is shuffled uniformly and cut to `max_questions`.
    /// - Each question's distractors plus its correct answer (once) are shuffled into
    ///   `display_options`.
    /// - An empty subset yields an empty session, which must not be started.
    pub fn build<'a, R>(
        &self,
        subset: impl IntoIterator<Item = &'a QuestionRecord>,
        rng: &mut R,
    ) -> Session
    where
        R: Rng + ?Sized,
    {
        let mut picked: Vec<&QuestionRecord> = subset.into_iter().collect();
        picked.as_mut_slice().shuffle(rng);
        picked.truncate(self.settings.max_questions());

        let questions = picked
            .into_iter()
            .map(|record| {
                let display_options = shuffled_options(record, rng);
                SessionQuestion::new(record.clone(), display_options)
            })
            .collect();

        Session::new(questions)
    }
}

fn shuffled_options<R>(record: &QuestionRecord, rng: &mut R) -> Vec<String>
where
    R: Rng + ?Sized,
{
    let mut pool: Vec<String> = record
        .distractors()
        .into_iter()
        .map(str::to_owned)
        .collect();
    pool.push(record.answer().to_owned());
    pool.as_mut_slice().shuffle(rng);
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MAX_OPTION_SLOTS, QuestionDraft};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn record(id: u32, options: &[&str], answer: &str) -> QuestionRecord {
        QuestionDraft {
            id: format!("Q{id}"),
            category: "math".into(),
            prompt: format!("question {id}"),
            options: options.iter().map(|o| (*o).to_owned()).collect(),
            answer: answer.into(),
            ..QuestionDraft::default()
        }
        .validate()
        .unwrap()
    }

    fn records(n: u32) -> Vec<QuestionRecord> {
        (0..n)
            .map(|i| record(i, &["a", "b", "c", "", "d"], "b"))
            .collect()
    }

    #[test]
    fn empty_subset_builds_empty_session() {
        let mut rng = StdRng::seed_from_u64(1);
        let session = SessionBuilder::default().build(Vec::new(), &mut rng);
        assert!(session.is_empty());
    }

    #[test]
    fn session_length_is_min_of_cap_and_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = records(8);
        let builder = SessionBuilder::default();
        assert_eq!(builder.build(&pool, &mut rng).len(), 5);
        assert_eq!(builder.build(&pool[..2], &mut rng).len(), 2);

        let wide = SessionBuilder::new(SessionSettings::new(20).unwrap());
        assert_eq!(wide.build(&pool, &mut rng).len(), 8);
    }

    #[test]
    fn picks_distinct_questions_from_subset() {
        let mut rng = StdRng::seed_from_u64(3);
        let pool = records(10);
        let session = SessionBuilder::default().build(&pool, &mut rng);
        let ids: HashSet<_> = session.questions().iter().map(|q| q.id().clone()).collect();
        assert_eq!(ids.len(), session.len());
        for id in &ids {
            assert!(pool.iter().any(|r| r.id() == id));
        }
    }

    #[test]
    fn display_options_hold_answer_once_and_each_slot_at_most_once() {
        let mut rng = StdRng::seed_from_u64(11);
        let pool = vec![
            record(1, &["a", "b", "c", "d"], "c"),
            record(2, &["a", "a", "", "b"], "b"),
            record(3, &["x", "y"], "z"),
        ];
        let session = SessionBuilder::default().build(&pool, &mut rng);
        for question in session.questions() {
            let options = question.display_options();
            let answer = question.record().answer();
            assert_eq!(options.iter().filter(|o| *o == answer).count(), 1);
            let distinct: HashSet<_> = options.iter().collect();
            assert_eq!(distinct.len(), options.len());
            assert!(options.iter().all(|o| !o.is_empty()));
        }
    }

    #[test]
    fn answer_missing_from_slots_is_merged_in() {
        let mut rng = StdRng::seed_from_u64(5);
        let pool = vec![record(1, &["x", "y"], "z")];
        let session = SessionBuilder::default().build(&pool, &mut rng);
        let mut options = session.questions()[0].display_options().to_vec();
        options.sort();
        assert_eq!(options, vec!["x", "y", "z"]);
    }

    #[test]
    fn display_options_never_exceed_slot_limit() {
        let mut rng = StdRng::seed_from_u64(9);
        let slots: Vec<String> = (0..10).map(|i| format!("d{i}")).collect();
        let slots: Vec<&str> = slots.iter().map(String::as_str).collect();
        let pool = vec![record(1, &slots, "d0"), record(2, &slots[..9], "ans")];
        let session = SessionBuilder::default().build(&pool, &mut rng);
        for question in session.questions() {
            assert!(question.display_options().len() <= MAX_OPTION_SLOTS);
        }
    }

    #[test]
    fn shuffle_reaches_every_answer_position() {
        let pool = vec![record(1, &["a", "b", "c", "d"], "a")];
        let builder = SessionBuilder::default();
        let mut positions = HashSet::new();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let session = builder.build(&pool, &mut rng);
            let question = &session.questions()[0];
            let pos = question
                .display_options()
                .iter()
                .position(|o| o == "a")
                .unwrap();
            positions.insert(pos);
        }
        assert_eq!(positions.len(), 4);
    }
}
