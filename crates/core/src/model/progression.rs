use url::Url;

use crate::model::ids::{ChapterId, CourseId, LessonId};
use crate::model::score::Score;

//
// ─── OUTLINE TYPES ─────────────────────────────────────────────────────────────
//

/// One lesson as listed in a course outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSummary {
    pub id: LessonId,
    pub title: String,
    pub video_url: Option<Url>,
    pub completed: bool,
}

/// One chapter as listed in a course outline, with the learner's state.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterSummary {
    pub id: ChapterId,
    pub title: String,
    pub lessons: Vec<LessonSummary>,
    /// Best recorded quiz score, if the learner has attempted the quiz.
    pub quiz_score: Option<Score>,
}

impl ChapterSummary {
    /// A chapter is passed once its quiz score clears the pass threshold.
    #[must_use]
    pub fn is_passed(&self) -> bool {
        self.quiz_score.is_some_and(|s| s.is_passing())
    }

    #[must_use]
    pub fn lessons_completed(&self) -> bool {
        self.lessons.iter().all(|l| l.completed)
    }

    /// Length of the completed prefix of the lesson list.
    ///
    /// Progression is lock-step, so a completed lesson after an incomplete
    /// one does not widen access.
    #[must_use]
    pub fn completed_prefix(&self) -> usize {
        self.lessons
            .iter()
            .take_while(|l| l.completed)
            .count()
    }
}

/// Full outline of a course for one learner.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseOutline {
    pub id: CourseId,
    pub title: String,
    pub chapters: Vec<ChapterSummary>,
}

//
// ─── UNLOCK STATE ──────────────────────────────────────────────────────────────
//

/// Whether a chapter's quiz can be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizGate {
    /// Some lesson is still incomplete.
    Locked,
    /// All lessons done, quiz not yet passed.
    Open,
    /// Quiz already passed.
    Passed,
}

/// Access state for one chapter, in outline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterAccess {
    /// The previous chapter has not been passed yet.
    Locked,
    Open {
        /// How many lessons, counted from the start, may be opened.
        open_lessons: usize,
        quiz: QuizGate,
    },
}

impl CourseOutline {
    /// Compute per-chapter access under lock-step progression.
    ///
    /// Chapter 0 is always open; each later chapter opens only once the
    /// previous chapter's quiz is passed. Inside an open chapter, lessons
    /// open sequentially and the quiz opens after the last lesson.
    #[must_use]
    pub fn unlock_state(&self) -> Vec<ChapterAccess> {
        let mut previous_passed = true;
        self.chapters
            .iter()
            .map(|chapter| {
                if !previous_passed {
                    return ChapterAccess::Locked;
                }
                let access = ChapterAccess::Open {
                    open_lessons: open_lesson_count(chapter),
                    quiz: quiz_gate(chapter),
                };
                previous_passed = chapter.is_passed();
                access
            })
            .collect()
    }
}

fn open_lesson_count(chapter: &ChapterSummary) -> usize {
    let total = chapter.lessons.len();
    (chapter.completed_prefix() + 1).min(total)
}

fn quiz_gate(chapter: &ChapterSummary) -> QuizGate {
    if chapter.is_passed() {
        QuizGate::Passed
    } else if chapter.lessons_completed() {
        QuizGate::Open
    } else {
        QuizGate::Locked
    }
}
