mod engine;
mod progress;
mod ticker;
mod view;
mod workflow;

// Public API of the assessment subsystem.
pub use crate::error::AssessmentError;
pub use engine::{AssessmentSession, QUIZ_TIME_BUDGET_SECS, SubmitState, Tick};
pub use progress::AssessmentProgress;
pub use ticker::QuizTicker;
pub use view::{AssessmentView, OptionView, QuestionView, format_remaining};
pub use workflow::{AssessmentLoopService, SubmitReport};
