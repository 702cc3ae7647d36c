//! Multiple-choice quiz sessions over a flashcard set.
//!
//! A [`QuizSession`] is generated from a set with an injected random source,
//! driven by [`QuizSession::submit_answer`] and [`QuizSession::advance`], and
//! summarised once completed. Sessions are never persisted.

mod error;
mod generate;
mod question;
mod session;
mod size;
mod summary;

pub use error::{QuizError, StateViolation};
pub use question::{AnswerFeedback, Question};
pub use session::{QuizPhase, QuizProgress, QuizSession};
pub use size::{ParseQuizSizeError, QuizSize};
pub use summary::{QuestionResult, QuizSummary};

/// Smallest set a quiz can be generated from: one answer plus three distractors.
pub const MIN_QUIZ_CARDS: usize = 4;

/// Wrong options shown next to the correct definition.
pub const DISTRACTOR_COUNT: usize = MIN_QUIZ_CARDS - 1;

/// Options per question.
pub const OPTION_COUNT: usize = DISTRACTOR_COUNT + 1;

/// Minimum percentage that counts as a pass.
pub const PASS_THRESHOLD_PERCENT: u32 = 70;
