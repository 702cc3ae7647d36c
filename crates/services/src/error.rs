//! Shared error types for the services crate.

use thiserror::Error;

use flashcards_core::model::SetId;
use flashcards_core::quiz::QuizError;
use flashcards_core::study::StudyError;
use storage::repository::StorageError;

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("flashcard set {0} not found")]
    SetNotFound(SetId),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StudyService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StudyServiceError {
    #[error("flashcard set {0} not found")]
    SetNotFound(SetId),
    #[error(transparent)]
    Study(#[from] StudyError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `LibraryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LibraryServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
