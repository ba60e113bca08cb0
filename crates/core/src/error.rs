use thiserror::Error;

use crate::model::{QuestionError, SheetError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Sheet(#[from] SheetError),
}
