#![forbid(unsafe_code)]

pub mod error;
pub mod library_service;
pub mod quiz_service;
mod rng;
pub mod study_service;

pub use flashcards_core::Clock;

pub use error::{LibraryServiceError, QuizServiceError, StudyServiceError};
pub use library_service::{LibraryService, LibraryStats, SectionOverview};
pub use quiz_service::QuizService;
pub use study_service::StudyService;
