use thiserror::Error;

/// Which ordering rule an out-of-sequence call broke.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateViolation {
    #[error("the current question was already answered")]
    AlreadyAnswered,

    #[error("the current question has not been answered")]
    NotAnswered,

    #[error("the quiz is already completed")]
    Completed,

    #[error("the quiz is not completed yet")]
    NotCompleted,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("a quiz needs at least {required} cards, the set has {available}")]
    InsufficientCards { required: usize, available: usize },

    #[error("invalid quiz state: {0}")]
    InvalidState(#[from] StateViolation),

    #[error("option {index} is out of range for {len} options")]
    OptionOutOfRange { index: usize, len: usize },
}
