mod ids;
mod progression;
mod question;
mod score;
mod selection;

pub use ids::{AuthToken, ChapterId, CourseId, LessonId, OptionId, QuestionId, SessionId};

pub use progression::{ChapterAccess, ChapterSummary, CourseOutline, LessonSummary, QuizGate};
pub use question::{AnswerOption, Question, QuestionDraft, QuestionError, QuizSheet, SheetError};
pub use score::{AttemptOutcome, PASS_THRESHOLD, Score};
pub use selection::{SelectionChange, SelectionSet};
