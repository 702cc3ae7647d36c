use thiserror::Error;

use crate::model::{CardError, ParseIdError, SetError};
use crate::quiz::QuizError;
use crate::study::StudyError;

/// Any error raised by the core crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Id(#[from] ParseIdError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error(transparent)]
    Set(#[from] SetError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Study(#[from] StudyError),
}
