#![forbid(unsafe_code)]

pub mod assessment;
pub mod context;
pub mod error;
pub mod heartbeat;
pub mod progression;

pub use edupath_core::Clock;

pub use error::{AssessmentError, ProgressionError};

pub use assessment::{
    AssessmentLoopService, AssessmentProgress, AssessmentSession, AssessmentView, QUIZ_TIME_BUDGET_SECS,
    QuizTicker, SubmitReport, SubmitState, Tick,
};
pub use context::{AccountKind, SessionContext};
pub use heartbeat::{HeartbeatHandle, HeartbeatService, HeartbeatStatus};
pub use progression::{CourseBoard, CourseProgressService};
