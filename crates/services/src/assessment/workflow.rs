use rand::seq::SliceRandom;
use std::sync::Arc;

use api::{QuestionProvider, ScoreSubmitter};
use edupath_core::model::{AttemptOutcome, ChapterId, Score};

use super::engine::{AssessmentSession, SubmitState};
use crate::Clock;
use crate::context::SessionContext;
use crate::error::AssessmentError;

/// Result of closing out an attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmitReport {
    pub outcome: AttemptOutcome,
    pub submit_state: SubmitState,
}

/// Orchestrates quiz loading and exactly-once score submission.
#[derive(Clone)]
pub struct AssessmentLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionProvider>,
    scores: Arc<dyn ScoreSubmitter>,
    shuffle_options: bool,
}

impl AssessmentLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionProvider>,
        scores: Arc<dyn ScoreSubmitter>,
    ) -> Self {
        Self {
            clock,
            questions,
            scores,
            shuffle_options: false,
        }
    }

    /// Shuffle answer-option display order on load.
    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle_options: bool) -> Self {
        self.shuffle_options = shuffle_options;
        self
    }

    /// Load the chapter quiz and start a fresh session.
    ///
    /// # Errors
    ///
    /// Returns `AssessmentError::Api` when the quiz cannot be fetched or the
    /// response fails schema validation; no session starts in that case.
    pub async fn start(
        &self,
        chapter_id: ChapterId,
        ctx: &SessionContext,
    ) -> Result<AssessmentSession, AssessmentError> {
        let mut sheet = self
            .questions
            .fetch_quiz(chapter_id, ctx.auth_token())
            .await?;

        if self.shuffle_options {
            let mut rng = rand::rng();
            sheet.shuffle_options_with(|options| options.shuffle(&mut rng));
        }

        Ok(AssessmentSession::new(chapter_id, sheet, self.clock.now()))
    }

    /// Score the attempt and dispatch the submission if still pending.
    ///
    /// A failed remote call is logged, recorded as `SubmitState::Failed`,
    /// and the attempt stays closed; retrying means starting a fresh
    /// session, never reopening this one.
    pub async fn submit(
        &self,
        session: &mut AssessmentSession,
        ctx: &SessionContext,
    ) -> SubmitReport {
        let score = session.calculate_score();

        if let Some(pending) = session.take_pending_submission() {
            if self.deliver(session.chapter_id(), pending, ctx).await {
                session.mark_submission_accepted();
            } else {
                session.mark_submission_failed();
            }
        }

        SubmitReport {
            outcome: AttemptOutcome::new(session.attempt_number(), score),
            submit_state: session.submit_state(),
        }
    }

    /// Deliver a score to the backend; returns whether it was accepted.
    pub(crate) async fn deliver(
        &self,
        chapter_id: ChapterId,
        score: Score,
        ctx: &SessionContext,
    ) -> bool {
        match self
            .scores
            .submit_score(chapter_id, score, ctx.auth_token())
            .await
        {
            Ok(()) => true,
            Err(err) => {
                log::warn!("score submission failed for chapter {chapter_id}: {err}");
                false
            }
        }
    }
}
