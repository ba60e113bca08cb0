use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use edupath_core::model::{
    AuthToken, ChapterId, CourseId, CourseOutline, LessonId, QuizSheet, Score, SessionId,
    SheetError,
};

/// Errors surfaced by backend adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("response did not match the expected schema: {0}")]
    Schema(String),

    #[error("connection error: {0}")]
    Connection(String),
}

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        ApiError::Schema(err.to_string())
    }
}

/// Result of a session-validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCheck {
    pub still_valid: bool,
}

//
// ─── PROVIDER CONTRACTS ────────────────────────────────────────────────────────
//

/// Supplies the question set for a chapter quiz, once per session load.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Fetch and validate the quiz for a chapter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Schema` when the response does not validate, or
    /// other `ApiError` values for transport failures.
    async fn fetch_quiz(
        &self,
        chapter_id: ChapterId,
        auth: &AuthToken,
    ) -> Result<QuizSheet, ApiError>;
}

/// Persists a final quiz score remotely.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    /// Submit the final score for a chapter attempt.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects or cannot receive the score.
    async fn submit_score(
        &self,
        chapter_id: ChapterId,
        score: Score,
        auth: &AuthToken,
    ) -> Result<(), ApiError>;
}

/// Session liveness and learning-time reporting for lesson screens.
#[async_trait]
pub trait SessionHeartbeat: Send + Sync {
    /// Ask the backend whether this device session is still the active one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or schema failures.
    async fn check_session(
        &self,
        session_id: &SessionId,
        auth: &AuthToken,
    ) -> Result<SessionCheck, ApiError>;

    /// Report elapsed learning time for a lesson.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the report cannot be delivered.
    async fn report_time(
        &self,
        lesson_id: LessonId,
        elapsed_secs: u32,
        auth: &AuthToken,
    ) -> Result<(), ApiError>;
}

/// Supplies course outlines with the learner's completion state.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Fetch the outline for a course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown courses, or other `ApiError`
    /// values for transport and schema failures.
    async fn fetch_course(
        &self,
        course_id: CourseId,
        auth: &AuthToken,
    ) -> Result<CourseOutline, ApiError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

/// In-memory backend double for tests and prototyping.
///
/// Seeded sheets and outlines are served verbatim; submitted scores and time
/// reports are recorded so tests can assert on them.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    sheets: Arc<Mutex<HashMap<ChapterId, QuizSheet>>>,
    courses: Arc<Mutex<HashMap<CourseId, CourseOutline>>>,
    submitted: Arc<Mutex<Vec<(ChapterId, Score)>>>,
    reported: Arc<Mutex<Vec<(LessonId, u32)>>>,
    active_session: Arc<Mutex<Option<SessionId>>>,
    fail_submissions: Arc<AtomicBool>,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the quiz served for a chapter.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Connection` if the backing map is poisoned.
    pub fn seed_sheet(&self, chapter_id: ChapterId, sheet: QuizSheet) -> Result<(), ApiError> {
        let mut guard = self
            .sheets
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.insert(chapter_id, sheet);
        Ok(())
    }

    /// Seed the outline served for a course.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Connection` if the backing map is poisoned.
    pub fn seed_course(&self, outline: CourseOutline) -> Result<(), ApiError> {
        let mut guard = self
            .courses
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.insert(outline.id, outline);
        Ok(())
    }

    /// Mark which session id the backend considers active.
    ///
    /// While unset, every session checks as valid.
    pub fn set_active_session(&self, session_id: Option<SessionId>) {
        if let Ok(mut guard) = self.active_session.lock() {
            *guard = session_id;
        }
    }

    /// Make `submit_score` fail, to exercise the fail-closed path.
    pub fn set_fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    /// Scores recorded so far, in submission order.
    #[must_use]
    pub fn submitted_scores(&self) -> Vec<(ChapterId, Score)> {
        self.submitted
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Time reports recorded so far, in delivery order.
    #[must_use]
    pub fn reported_time(&self) -> Vec<(LessonId, u32)> {
        self.reported
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QuestionProvider for InMemoryBackend {
    async fn fetch_quiz(
        &self,
        chapter_id: ChapterId,
        _auth: &AuthToken,
    ) -> Result<QuizSheet, ApiError> {
        let guard = self
            .sheets
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.get(&chapter_id).cloned().ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl ScoreSubmitter for InMemoryBackend {
    async fn submit_score(
        &self,
        chapter_id: ChapterId,
        score: Score,
        _auth: &AuthToken,
    ) -> Result<(), ApiError> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(ApiError::HttpStatus(
                reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
        let mut guard = self
            .submitted
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.push((chapter_id, score));
        Ok(())
    }
}

#[async_trait]
impl SessionHeartbeat for InMemoryBackend {
    async fn check_session(
        &self,
        session_id: &SessionId,
        _auth: &AuthToken,
    ) -> Result<SessionCheck, ApiError> {
        let guard = self
            .active_session
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        let still_valid = match *guard {
            None => true,
            Some(active) => active == *session_id,
        };
        Ok(SessionCheck { still_valid })
    }

    async fn report_time(
        &self,
        lesson_id: LessonId,
        elapsed_secs: u32,
        _auth: &AuthToken,
    ) -> Result<(), ApiError> {
        let mut guard = self
            .reported
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.push((lesson_id, elapsed_secs));
        Ok(())
    }
}

#[async_trait]
impl CatalogProvider for InMemoryBackend {
    async fn fetch_course(
        &self,
        course_id: CourseId,
        _auth: &AuthToken,
    ) -> Result<CourseOutline, ApiError> {
        let guard = self
            .courses
            .lock()
            .map_err(|e| ApiError::Connection(e.to_string()))?;
        guard.get(&course_id).cloned().ok_or(ApiError::NotFound)
    }
}

//
// ─── BACKEND AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the provider contracts behind trait objects for easy swapping.
#[derive(Clone)]
pub struct Backend {
    pub questions: Arc<dyn QuestionProvider>,
    pub scores: Arc<dyn ScoreSubmitter>,
    pub sessions: Arc<dyn SessionHeartbeat>,
    pub catalog: Arc<dyn CatalogProvider>,
}

impl Backend {
    #[must_use]
    pub fn in_memory() -> Self {
        let backend = InMemoryBackend::new();
        Self {
            questions: Arc::new(backend.clone()),
            scores: Arc::new(backend.clone()),
            sessions: Arc::new(backend.clone()),
            catalog: Arc::new(backend),
        }
    }

    #[must_use]
    pub fn http(http: crate::http::HttpBackend) -> Self {
        Self {
            questions: Arc::new(http.clone()),
            scores: Arc::new(http.clone()),
            sessions: Arc::new(http.clone()),
            catalog: Arc::new(http),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edupath_core::model::{AnswerOption, OptionId, QuestionDraft, QuestionId};

    fn token() -> AuthToken {
        AuthToken::new("test-token")
    }

    fn sheet() -> QuizSheet {
        let draft = QuestionDraft {
            id: QuestionId::new(1),
            content: "Pick one".into(),
            num_correct: 1,
            options: vec![
                AnswerOption::new(OptionId::new(1), "A", true),
                AnswerOption::new(OptionId::new(2), "B", false),
            ],
        };
        QuizSheet::from_drafts(1, vec![draft]).unwrap()
    }

    #[tokio::test]
    async fn serves_seeded_sheet() {
        let backend = InMemoryBackend::new();
        let chapter = ChapterId::new(7);
        backend.seed_sheet(chapter, sheet()).unwrap();

        let fetched = backend.fetch_quiz(chapter, &token()).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched.attempt_number(), 1);
    }

    #[tokio::test]
    async fn unknown_chapter_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend
            .fetch_quiz(ChapterId::new(404), &token())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[tokio::test]
    async fn records_submitted_scores() {
        let backend = InMemoryBackend::new();
        let chapter = ChapterId::new(1);

        backend
            .submit_score(chapter, Score::from_percent(80.0), &token())
            .await
            .unwrap();

        let submitted = backend.submitted_scores();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].0, chapter);
    }

    #[tokio::test]
    async fn failing_submissions_return_http_status() {
        let backend = InMemoryBackend::new();
        backend.set_fail_submissions(true);

        let err = backend
            .submit_score(ChapterId::new(1), Score::from_percent(50.0), &token())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus(_)));
        assert!(backend.submitted_scores().is_empty());
    }

    #[tokio::test]
    async fn session_check_tracks_active_session() {
        let backend = InMemoryBackend::new();
        let mine = SessionId::generate();

        let check = backend.check_session(&mine, &token()).await.unwrap();
        assert!(check.still_valid);

        backend.set_active_session(Some(SessionId::generate()));
        let check = backend.check_session(&mine, &token()).await.unwrap();
        assert!(!check.still_valid);
    }
}
