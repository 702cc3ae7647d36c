use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How many questions a quiz should ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuizSize {
    /// At most this many questions; capped at the set's card count.
    Count(NonZeroUsize),
    /// One question per card.
    #[default]
    All,
}

impl QuizSize {
    /// Fixed sizes offered next to [`QuizSize::All`] when setting up a quiz.
    pub const PRESETS: [usize; 3] = [5, 10, 15];

    /// Returns `None` for zero.
    #[must_use]
    pub fn count(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Self::Count)
    }

    /// Number of questions this size yields for a set of `available` cards.
    #[must_use]
    pub fn resolve(self, available: usize) -> usize {
        match self {
            Self::Count(n) => n.get().min(available),
            Self::All => available,
        }
    }

    /// Whether a set of `available` cards can fill this size without capping.
    #[must_use]
    pub fn fits(self, available: usize) -> bool {
        match self {
            Self::Count(n) => n.get() <= available,
            Self::All => true,
        }
    }
}

impl fmt::Display for QuizSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Error for a quiz size that is neither `all` nor a positive integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseQuizSizeError {
    raw: String,
}

impl fmt::Display for ParseQuizSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid quiz size {:?}: expected \"all\" or a positive integer",
            self.raw
        )
    }
}

impl std::error::Error for ParseQuizSizeError {}

impl FromStr for QuizSize {
    type Err = ParseQuizSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        trimmed
            .parse::<usize>()
            .ok()
            .and_then(Self::count)
            .ok_or_else(|| ParseQuizSizeError { raw: s.to_string() })
    }
}
