//! Shared error types for the services crate.

use thiserror::Error;

use api::ApiError;
use edupath_core::model::OptionId;

/// Errors emitted by the assessment engine and workflow.
///
/// The engine only errors on structurally invalid input (bad indices, foreign
/// option ids) or on a failed quiz load; timer expiry, empty quizzes, and
/// repeated scoring are normal flow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssessmentError {
    #[error("question index {index} out of range for {len} questions")]
    QuestionIndex { index: usize, len: usize },

    #[error("option {option} does not belong to question {index}")]
    UnknownOption { index: usize, option: OptionId },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Errors emitted by the course progression service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressionError {
    #[error(transparent)]
    Api(#[from] ApiError),
}
