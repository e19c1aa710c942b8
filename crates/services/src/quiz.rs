use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use quiz_core::model::{
    Facet, FacetChoice, FilterSelection, Mistake, QuestionRecord, SessionQuestion, SessionSettings,
};
use quiz_core::report::{ResultSummary, summarize};
use quiz_core::runner::{Advance, AnswerOutcome, SessionRunner};
use quiz_core::{Clock, QuestionCatalog, SessionBuilder, apply_filter, facet_values};

use crate::error::QuizError;
use crate::identity::Identity;
use crate::progress::{ProgressRecord, ProgressReporter};

/// Final outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResults {
    pub summary: ResultSummary,
    pub remark: String,
    pub correct: usize,
    pub answered: usize,
    pub mistakes: Vec<Mistake>,
}

impl QuizResults {
    #[must_use]
    pub fn celebrates(&self) -> bool {
        self.summary.tier.celebrates()
    }
}

/// Where the quiz flow currently is.
#[derive(Debug)]
pub enum QuizPhase {
    /// Pre-start screen: choosing filters.
    Idle,
    Running(SessionRunner),
    Finished(QuizResults),
}

/// Single-user quiz flow: filter, start, answer, advance, results.
///
/// Every call runs to completion before the next; the only background work is
/// progress delivery, which never feeds back into quiz state.
pub struct QuizService {
    catalog: QuestionCatalog,
    selection: FilterSelection,
    builder: SessionBuilder,
    phase: QuizPhase,
    display_name: String,
    identity: Option<Identity>,
    reporter: ProgressReporter,
    clock: Clock,
    rng: StdRng,
}

impl QuizService {
    #[must_use]
    pub fn new(catalog: QuestionCatalog, reporter: ProgressReporter) -> Self {
        Self {
            catalog,
            selection: FilterSelection::default(),
            builder: SessionBuilder::default(),
            phase: QuizPhase::Idle,
            display_name: String::new(),
            identity: None,
            reporter,
            clock: Clock::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.builder = SessionBuilder::new(settings);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Use a seeded RNG so shuffles and remarks are reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn settings(&self) -> SessionSettings {
        self.builder.settings()
    }

    //
    // ─── FILTERS ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Change one facet. Any running or finished session is discarded.
    pub fn select(&mut self, facet: Facet, choice: FacetChoice) {
        if self.selection.get(facet) == &choice {
            return;
        }
        debug!(%facet, %choice, "filter changed");
        self.selection.set(facet, choice);
        self.discard_session();
    }

    /// Replace the whole selection. Any running or finished session is discarded.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        if self.selection == selection {
            return;
        }
        self.selection = selection;
        self.discard_session();
    }

    #[must_use]
    pub fn filtered(&self) -> Vec<&QuestionRecord> {
        apply_filter(&self.catalog, &self.selection)
    }

    #[must_use]
    pub fn has_questions(&self) -> bool {
        !self.filtered().is_empty()
    }

    #[must_use]
    pub fn facet_values(&self, facet: Facet) -> Vec<FacetChoice> {
        facet_values(&self.catalog, facet)
    }

    //
    // ─── USER ──────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn set_display_name(&mut self, name: impl Into<String>) {
        self.display_name = name.into().trim().to_owned();
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    //
    // ─── SESSION ───────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[must_use]
    pub fn runner(&self) -> Option<&SessionRunner> {
        match &self.phase {
            QuizPhase::Running(runner) => Some(runner),
            _ => None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&SessionQuestion> {
        self.runner().and_then(SessionRunner::current)
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        match &self.phase {
            QuizPhase::Finished(results) => Some(results),
            _ => None,
        }
    }

    /// Build a fresh session from the filtered questions and show the first one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` when nothing matches the filter; the
    /// current phase is left untouched in that case.
    pub fn start(&mut self) -> Result<&SessionQuestion, QuizError> {
        let subset = apply_filter(&self.catalog, &self.selection);
        if subset.is_empty() {
            warn!(selection = ?self.selection, "no questions match the selected filters");
            return Err(QuizError::NoQuestions);
        }

        let session = self.builder.build(subset, &mut self.rng);
        let runner = SessionRunner::new(session)?;
        info!(questions = runner.len(), "quiz started");
        self.phase = QuizPhase::Running(runner);

        self.current().ok_or(QuizError::NotRunning)
    }

    /// Answer the current question.
    ///
    /// A progress record is sent in the background when an identity is known.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotRunning` outside a session, or the runner's error
    /// for an illegal submission.
    pub fn submit_answer(&mut self, option: &str) -> Result<AnswerOutcome, QuizError> {
        let outcome = self.runner_mut()?.submit_answer(option)?;
        self.emit_progress(&outcome);
        Ok(outcome)
    }

    /// Answer the current question by option position.
    ///
    /// # Errors
    ///
    /// Same as [`QuizService::submit_answer`], plus out-of-range indices.
    pub fn submit_choice(&mut self, index: usize) -> Result<AnswerOutcome, QuizError> {
        let outcome = self.runner_mut()?.submit_choice(index)?;
        self.emit_progress(&outcome);
        Ok(outcome)
    }

    /// Move past the answered question; finishing the last one produces results.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotRunning` outside a session, or `RunnerError::NotAwaiting`
    /// if the current question has not been answered.
    pub fn advance(&mut self) -> Result<Advance, QuizError> {
        let advance = self.runner_mut()?.advance()?;
        if advance == Advance::Completed {
            self.finish();
        }
        Ok(advance)
    }

    /// Back to the pre-start screen. Filters, name and identity are kept.
    pub fn reset(&mut self) {
        self.discard_session();
    }

    fn runner_mut(&mut self) -> Result<&mut SessionRunner, QuizError> {
        match &mut self.phase {
            QuizPhase::Running(runner) => Ok(runner),
            _ => Err(QuizError::NotRunning),
        }
    }

    fn discard_session(&mut self) {
        if !matches!(self.phase, QuizPhase::Idle) {
            debug!("discarding session");
        }
        self.phase = QuizPhase::Idle;
    }

    fn finish(&mut self) {
        let QuizPhase::Running(runner) = std::mem::replace(&mut self.phase, QuizPhase::Idle) else {
            return;
        };

        let score = runner.score().clone();
        let summary = summarize(score.correct, score.answered);
        let name = Some(self.display_name.as_str()).filter(|n| !n.is_empty());
        let remark = summary.tier.remark(&mut self.rng, name);
        info!(
            correct = score.correct,
            answered = score.answered,
            accuracy = summary.accuracy_percent,
            tier = %summary.tier,
            "quiz completed"
        );

        self.phase = QuizPhase::Finished(QuizResults {
            summary,
            remark,
            correct: score.correct,
            answered: score.answered,
            mistakes: score.mistakes,
        });
    }

    fn emit_progress(&self, outcome: &AnswerOutcome) {
        let Some(identity) = &self.identity else {
            warn!(
                question_id = %outcome.question_id,
                "identity not ready, progress record skipped"
            );
            return;
        };
        let record = ProgressRecord::from_outcome(
            outcome,
            &identity.user_id,
            &self.display_name,
            self.clock.now_millis(),
        );
        // detached: delivery never feeds back into quiz state
        drop(self.reporter.report(record));
    }
}

impl fmt::Debug for QuizService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizService")
            .field("catalog_len", &self.catalog.len())
            .field("selection", &self.selection)
            .field("phase", &self.phase)
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
