//! Wire shapes for backend responses, with validation into domain types.
//!
//! The backend speaks camelCase JSON. Every response DTO derives
//! `Deserialize` only and carries an `into_domain` conversion; callers get
//! either a validated domain value or a schema error, never a half-parsed
//! struct.

use serde::Deserialize;
use url::Url;

use edupath_core::model::{
    AnswerOption, ChapterId, ChapterSummary, CourseId, CourseOutline, LessonId, LessonSummary,
    OptionId, QuestionDraft, QuestionId, QuizSheet, Score, SheetError,
};

use crate::providers::SessionCheck;

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub attempt_number: u32,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: u64,
    pub content: String,
    pub num_correct: u32,
    pub options: Vec<OptionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDto {
    pub id: u64,
    pub option_data: String,
    pub is_correct: bool,
}

impl QuizResponse {
    /// Validate the response into a `QuizSheet`.
    ///
    /// # Errors
    ///
    /// Returns `SheetError` when any question fails validation or option ids
    /// collide across questions.
    pub fn into_domain(self) -> Result<QuizSheet, SheetError> {
        let drafts = self
            .questions
            .into_iter()
            .map(|q| QuestionDraft {
                id: QuestionId::new(q.id),
                content: q.content,
                num_correct: q.num_correct,
                options: q
                    .options
                    .into_iter()
                    .map(|o| AnswerOption::new(OptionId::new(o.id), o.option_data, o.is_correct))
                    .collect(),
            })
            .collect();
        QuizSheet::from_drafts(self.attempt_number, drafts)
    }
}

//
// ─── COURSE OUTLINE ────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub chapters: Vec<ChapterDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<LessonDto>,
    pub quiz_score: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub id: u64,
    pub title: String,
    pub video_url: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl CourseResponse {
    /// Convert into the domain outline.
    ///
    /// An unparsable lesson video URL degrades to `None` rather than failing
    /// the whole outline; the lesson list itself must be well formed.
    #[must_use]
    pub fn into_domain(self) -> CourseOutline {
        CourseOutline {
            id: CourseId::new(self.id),
            title: self.title,
            chapters: self
                .chapters
                .into_iter()
                .map(|c| ChapterSummary {
                    id: ChapterId::new(c.id),
                    title: c.title,
                    lessons: c
                        .lessons
                        .into_iter()
                        .map(|l| LessonSummary {
                            id: LessonId::new(l.id),
                            title: l.title,
                            video_url: l.video_url.as_deref().and_then(parse_video_url),
                            completed: l.completed,
                        })
                        .collect(),
                    quiz_score: c.quiz_score.map(Score::from_percent),
                })
                .collect(),
        }
    }
}

fn parse_video_url(raw: &str) -> Option<Url> {
    match Url::parse(raw) {
        Ok(url) => Some(url),
        Err(err) => {
            log::debug!("ignoring invalid lesson video url {raw:?}: {err}");
            None
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCheckResponse {
    pub still_valid: bool,
}

impl SessionCheckResponse {
    #[must_use]
    pub fn into_domain(self) -> SessionCheck {
        SessionCheck {
            still_valid: self.still_valid,
        }
    }
}
