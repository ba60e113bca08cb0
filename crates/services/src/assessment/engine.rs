use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

use edupath_core::model::{
    AttemptOutcome, ChapterId, OptionId, Question, QuizSheet, Score, SelectionChange, SelectionSet,
};

use super::progress::AssessmentProgress;
use crate::error::AssessmentError;

/// Fixed time budget for one chapter quiz attempt.
pub const QUIZ_TIME_BUDGET_SECS: u32 = 600;

/// Where the remote submission stands for this attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    /// No scoring pass has run; answers may still change.
    Open,
    /// Score computed, remote dispatch not yet performed.
    AwaitingDispatch,
    /// The backend accepted the score.
    Accepted,
    /// The remote call failed; the attempt stays closed regardless.
    Failed,
}

/// Outcome of a single timer tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub remaining_secs: u32,
    /// Set on the tick that drove the timer to zero and triggered scoring.
    pub expired_score: Option<Score>,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state for one timed chapter quiz attempt.
///
/// Holds the loaded question set, one selection per question, the countdown,
/// and the single-submission gate. Every attempt is a fresh instance; nothing
/// carries over between attempts except what is refetched from the backend.
pub struct AssessmentSession {
    chapter_id: ChapterId,
    sheet: QuizSheet,
    selections: Vec<SelectionSet>,
    /// Ids of every correct option across the sheet, computed once on load.
    correct_ids: HashSet<OptionId>,
    remaining_secs: u32,
    final_score: Option<Score>,
    is_submitted: bool,
    pending_submission: Option<Score>,
    submit_state: SubmitState,
    started_at: DateTime<Utc>,
}

impl AssessmentSession {
    /// Create a session for a freshly loaded sheet.
    ///
    /// An empty sheet is a valid session; scoring it yields zero.
    #[must_use]
    pub fn new(chapter_id: ChapterId, sheet: QuizSheet, started_at: DateTime<Utc>) -> Self {
        let selections = sheet
            .questions()
            .iter()
            .map(|q| SelectionSet::new(usize::try_from(q.num_correct()).unwrap_or(usize::MAX)))
            .collect();
        let correct_ids = sheet
            .questions()
            .iter()
            .flat_map(Question::correct_option_ids)
            .collect();

        Self {
            chapter_id,
            sheet,
            selections,
            correct_ids,
            remaining_secs: QUIZ_TIME_BUDGET_SECS,
            final_score: None,
            is_submitted: false,
            pending_submission: None,
            submit_state: SubmitState::Open,
            started_at,
        }
    }

    //
    // ─── MUTATORS ──────────────────────────────────────────────────────────
    //

    /// Toggle an option for a question.
    ///
    /// Selecting an already-selected option deselects it; selecting into a
    /// full question evicts the oldest selection (FIFO). After submission the
    /// call is tolerated but ignored, returning `Ok(None)` — scored state is
    /// never corrupted by a stray UI event.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::QuestionIndex` for an out-of-range index and
    /// `AssessmentError::UnknownOption` for an option id that does not belong
    /// to the question.
    pub fn select_option(
        &mut self,
        question_index: usize,
        option_id: OptionId,
    ) -> Result<Option<SelectionChange>, AssessmentError> {
        let len = self.sheet.len();
        let Some(question) = self.sheet.questions().get(question_index) else {
            return Err(AssessmentError::QuestionIndex {
                index: question_index,
                len,
            });
        };
        if !question.has_option(option_id) {
            return Err(AssessmentError::UnknownOption {
                index: question_index,
                option: option_id,
            });
        }
        if self.is_submitted {
            return Ok(None);
        }

        Ok(Some(self.selections[question_index].toggle(option_id)))
    }

    /// Advance the countdown by one second.
    ///
    /// The timer floors at zero. On the transition to zero with no submission
    /// recorded yet, scoring runs automatically; later ticks are no-ops, so
    /// rescoring cannot happen however often the caller keeps ticking.
    pub fn tick(&mut self) -> Tick {
        if self.is_submitted || self.remaining_secs == 0 {
            return Tick {
                remaining_secs: self.remaining_secs,
                expired_score: None,
            };
        }

        self.remaining_secs -= 1;
        if self.remaining_secs == 0 && !self.is_submitted {
            let score = self.calculate_score();
            return Tick {
                remaining_secs: 0,
                expired_score: Some(score),
            };
        }

        Tick {
            remaining_secs: self.remaining_secs,
            expired_score: None,
        }
    }

    /// Compute the final score and close the submission window.
    ///
    /// The first call scores the current selections and marks the attempt
    /// submitted before any remote call happens (fail-closed). Subsequent
    /// calls return the recorded score unchanged.
    pub fn calculate_score(&mut self) -> Score {
        if let Some(score) = self.final_score {
            return score;
        }

        let total_correct = self.sheet.total_correct_slots();
        let total_correct_answered: usize = self
            .selections
            .iter()
            .map(|selection| {
                selection
                    .iter()
                    .filter(|id| self.correct_ids.contains(id))
                    .count()
            })
            .sum();

        let score = Score::from_ratio(total_correct_answered, total_correct);
        self.final_score = Some(score);
        self.is_submitted = true;
        self.pending_submission = Some(score);
        self.submit_state = SubmitState::AwaitingDispatch;
        score
    }

    /// Yield the score for remote dispatch, exactly once.
    ///
    /// Both trigger paths (manual submit, timer expiry) funnel through this,
    /// so only the first caller performs the remote submission.
    pub fn take_pending_submission(&mut self) -> Option<Score> {
        self.pending_submission.take()
    }

    pub(crate) fn mark_submission_accepted(&mut self) {
        self.submit_state = SubmitState::Accepted;
    }

    pub(crate) fn mark_submission_failed(&mut self) {
        self.submit_state = SubmitState::Failed;
    }

    //
    // ─── READ PROJECTIONS ──────────────────────────────────────────────────
    //

    #[must_use]
    pub fn chapter_id(&self) -> ChapterId {
        self.chapter_id
    }

    #[must_use]
    pub fn attempt_number(&self) -> u32 {
        self.sheet.attempt_number()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        self.sheet.questions()
    }

    #[must_use]
    pub fn selections(&self, question_index: usize) -> Option<&SelectionSet> {
        self.selections.get(question_index)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.is_submitted
    }

    #[must_use]
    pub fn final_score(&self) -> Option<Score> {
        self.final_score
    }

    #[must_use]
    pub fn submit_state(&self) -> SubmitState {
        self.submit_state
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns a summary of the current attempt for progress displays.
    #[must_use]
    pub fn progress(&self) -> AssessmentProgress {
        let total_questions = self.sheet.len();
        let answered_questions = self
            .selections
            .iter()
            .filter(|s| !s.is_empty())
            .count();
        AssessmentProgress {
            total_questions,
            answered_questions,
            remaining_secs: self.remaining_secs,
            is_submitted: self.is_submitted,
        }
    }

    /// Result-dialog data, available once the attempt is scored.
    #[must_use]
    pub fn outcome(&self) -> Option<AttemptOutcome> {
        self.final_score
            .map(|score| AttemptOutcome::new(self.attempt_number(), score))
    }
}

impl fmt::Debug for AssessmentSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentSession")
            .field("chapter_id", &self.chapter_id)
            .field("questions_len", &self.sheet.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("is_submitted", &self.is_submitted)
            .field("submit_state", &self.submit_state)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
