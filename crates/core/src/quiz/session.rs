use rand::Rng;

use crate::model::{FlashcardSet, SetId, percent};

use super::error::{QuizError, StateViolation};
use super::generate::build_questions;
use super::question::{AnswerFeedback, Question};
use super::size::QuizSize;
use super::summary::QuizSummary;

/// Where a session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Waiting for an answer to the current question.
    Unanswered,
    /// Current question answered; waiting for [`QuizSession::advance`].
    Answered,
    /// Every question answered and advanced past.
    Completed,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based number of the question on screen.
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub score: usize,
    /// Score as a share of all questions, rounded.
    pub score_percentage: u32,
    /// `position` as a share of all questions, rounded.
    pub progress_percentage: u32,
}

/// One quiz attempt over a generated question list.
///
/// Holds a snapshot of the source set so [`QuizSession::retake`] can
/// regenerate with the same size.
#[derive(Debug, Clone)]
pub struct QuizSession {
    set: FlashcardSet,
    size: QuizSize,
    questions: Vec<Question>,
    current: usize,
    score: usize,
    completed: bool,
}

impl QuizSession {
    /// Generate a fresh session from `set`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InsufficientCards` if the set has fewer than
    /// [`MIN_QUIZ_CARDS`](super::MIN_QUIZ_CARDS) cards.
    pub fn generate<R: Rng + ?Sized>(
        set: &FlashcardSet,
        size: QuizSize,
        rng: &mut R,
    ) -> Result<Self, QuizError> {
        let questions = build_questions(set.cards(), size, rng)?;
        Ok(Self {
            set: set.clone(),
            size,
            questions,
            current: 0,
            score: 0,
            completed: false,
        })
    }

    /// Record `answer` for the current question without moving on.
    ///
    /// The session is unchanged when this returns an error.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the quiz is completed or the
    /// current question already has an answer.
    pub fn submit_answer(&mut self, answer: impl Into<String>) -> Result<AnswerFeedback, QuizError> {
        let question = self.current_unanswered_mut()?;
        let correct = question.record(answer.into());
        let correct_answer = question.correct_answer().to_owned();
        if correct {
            self.score += 1;
        }
        Ok(AnswerFeedback {
            correct,
            correct_answer,
            score: self.score,
        })
    }

    /// Like [`QuizSession::submit_answer`], choosing an option by its
    /// display index.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OptionOutOfRange` for an index past the options,
    /// otherwise the same errors as `submit_answer`.
    pub fn submit_option(&mut self, index: usize) -> Result<AnswerFeedback, QuizError> {
        let question = self.current_unanswered_mut()?;
        let answer = question
            .options()
            .get(index)
            .cloned()
            .ok_or(QuizError::OptionOutOfRange {
                index,
                len: question.options().len(),
            })?;
        self.submit_answer(answer)
    }

    /// Move to the next question, or complete the quiz after the last one.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` if the quiz is completed or the
    /// current question has not been answered.
    pub fn advance(&mut self) -> Result<QuizPhase, QuizError> {
        if self.completed {
            return Err(StateViolation::Completed.into());
        }
        if !self.questions[self.current].is_answered() {
            return Err(StateViolation::NotAnswered.into());
        }

        if self.current + 1 < self.questions.len() {
            self.current += 1;
        } else {
            self.completed = true;
        }
        Ok(self.phase())
    }

    /// Final results.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidState` until the quiz is completed.
    pub fn summarize(&self) -> Result<QuizSummary, QuizError> {
        if !self.completed {
            return Err(StateViolation::NotCompleted.into());
        }
        Ok(QuizSummary::from_questions(&self.questions, self.score))
    }

    /// Start over with a newly generated session over the same set and size.
    ///
    /// Nothing from this session's answers carries over.
    ///
    /// # Errors
    ///
    /// Propagates generation errors.
    pub fn retake<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self, QuizError> {
        Self::generate(&self.set, self.size, rng)
    }

    fn current_unanswered_mut(&mut self) -> Result<&mut Question, QuizError> {
        if self.completed {
            return Err(StateViolation::Completed.into());
        }
        let question = &mut self.questions[self.current];
        if question.is_answered() {
            return Err(StateViolation::AlreadyAnswered.into());
        }
        Ok(question)
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.completed {
            QuizPhase::Completed
        } else if self.questions[self.current].is_answered() {
            QuizPhase::Answered
        } else {
            QuizPhase::Unanswered
        }
    }

    /// The question on screen; `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.completed {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    /// Index of the current question. Stays on the last question once completed.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.questions.iter().filter(|q| q.is_answered()).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn requested_size(&self) -> QuizSize {
        self.size
    }

    #[must_use]
    pub fn set_id(&self) -> &SetId {
        self.set.id()
    }

    #[must_use]
    pub fn set_title(&self) -> &str {
        self.set.title()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.total();
        let position = (self.current + 1).min(total);
        QuizProgress {
            position,
            total,
            answered: self.answered_count(),
            score: self.score,
            score_percentage: percent(self.score, total),
            progress_percentage: percent(position, total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Card, CardId, SectionId};
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn build_set(n: usize) -> FlashcardSet {
        let cards = (0..n).map(|i| {
            Card::new(
                CardId::new(format!("c{i}")).unwrap(),
                format!("Term {i}"),
                format!("Definition {i}"),
            )
            .unwrap()
        });
        FlashcardSet::new(
            SetId::new("s1").unwrap(),
            "Sample",
            None,
            SectionId::uncategorized(),
            fixed_now(),
        )
        .unwrap()
        .with_cards(cards)
        .unwrap()
    }

    fn wrong_option(q: &Question) -> String {
        q.options()
            .iter()
            .find(|o| o.as_str() != q.correct_answer())
            .cloned()
            .unwrap()
    }

    #[test]
    fn generate_sizes_quiz_from_request() {
        let set = build_set(10);
        let mut rng = StdRng::seed_from_u64(42);
        for k in 1..=10 {
            let session = QuizSession::generate(&set, QuizSize::count(k).unwrap(), &mut rng).unwrap();
            assert_eq!(session.total(), k);
        }
        let session = QuizSession::generate(&set, QuizSize::count(25).unwrap(), &mut rng).unwrap();
        assert_eq!(session.total(), 10);
        let session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        assert_eq!(session.total(), 10);
    }

    #[test]
    fn fresh_session_starts_unanswered() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(1);
        let session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert!(!session.is_complete());
        assert_eq!(session.phase(), QuizPhase::Unanswered);
    }

    #[test]
    fn each_question_uses_its_card_definition() {
        let set = build_set(6);
        let mut rng = StdRng::seed_from_u64(9);
        let session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        let mut seen: Vec<&str> = Vec::new();
        for q in session.questions() {
            assert_eq!(q.correct_answer(), q.card().definition());
            assert_eq!(q.options().len(), 4);
            assert_eq!(
                q.options().iter().filter(|o| *o == q.correct_answer()).count(),
                1
            );
            seen.push(q.card().id().as_str());
        }
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn insufficient_cards_is_rejected() {
        let set = build_set(3);
        let mut rng = StdRng::seed_from_u64(1);
        let err = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap_err();
        assert!(matches!(err, QuizError::InsufficientCards { available: 3, .. }));
    }

    #[test]
    fn double_submit_is_rejected_and_state_unchanged() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        let correct = session.current_question().unwrap().correct_answer().to_owned();

        let feedback = session.submit_answer(correct.clone()).unwrap();
        assert!(feedback.correct);
        assert_eq!(session.score(), 1);

        let before = session.clone();
        let wrong = wrong_option(session.current_question().unwrap());
        let err = session.submit_answer(wrong).unwrap_err();
        assert_eq!(err, QuizError::InvalidState(StateViolation::AlreadyAnswered));
        assert_eq!(session.score(), before.score());
        assert_eq!(session.questions(), before.questions());
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn advance_requires_answer() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        let err = session.advance().unwrap_err();
        assert_eq!(err, QuizError::InvalidState(StateViolation::NotAnswered));
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn submit_does_not_advance() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        session.submit_option(0).unwrap();
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), QuizPhase::Answered);
        assert_eq!(session.advance().unwrap(), QuizPhase::Unanswered);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn submit_option_out_of_range() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        let err = session.submit_option(4).unwrap_err();
        assert_eq!(err, QuizError::OptionOutOfRange { index: 4, len: 4 });
        assert!(!session.current_question().unwrap().is_answered());
    }

    #[test]
    fn all_correct_run_scores_full_marks() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(11);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        while !session.is_complete() {
            let answer = session.current_question().unwrap().correct_answer().to_owned();
            session.submit_answer(answer).unwrap();
            session.advance().unwrap();
        }
        let summary = session.summarize().unwrap();
        assert_eq!(summary.score, 4);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.percentage, 100);
        assert!(summary.passed);
    }

    #[test]
    fn all_wrong_run_scores_zero() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(12);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        while !session.is_complete() {
            let wrong = wrong_option(session.current_question().unwrap());
            session.submit_answer(wrong).unwrap();
            session.advance().unwrap();
        }
        let summary = session.summarize().unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.percentage, 0);
        assert!(!summary.passed);
        assert!(summary.results.iter().all(|r| !r.is_correct));
    }

    #[test]
    fn score_counts_matching_answers() {
        let set = build_set(8);
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        let mut expected = 0;
        let mut i = 0;
        while !session.is_complete() {
            let q = session.current_question().unwrap();
            let answer = if i % 3 == 0 {
                expected += 1;
                q.correct_answer().to_owned()
            } else {
                wrong_option(q)
            };
            session.submit_answer(answer).unwrap();
            assert!(session.score() <= session.current_index() + 1);
            session.advance().unwrap();
            i += 1;
        }
        assert_eq!(session.score(), expected);
    }

    #[test]
    fn completed_session_rejects_everything_but_summary() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = QuizSession::generate(&set, QuizSize::count(1).unwrap(), &mut rng).unwrap();
        assert!(session.summarize().is_err());
        session.submit_option(0).unwrap();
        assert_eq!(session.advance().unwrap(), QuizPhase::Completed);
        assert_eq!(session.current_question(), None);

        assert_eq!(
            session.submit_option(0).unwrap_err(),
            QuizError::InvalidState(StateViolation::Completed)
        );
        assert_eq!(
            session.advance().unwrap_err(),
            QuizError::InvalidState(StateViolation::Completed)
        );
        assert!(session.summarize().is_ok());
    }

    #[test]
    fn retake_keeps_size_and_resets_progress() {
        let set = build_set(10);
        let mut rng = StdRng::seed_from_u64(21);
        let mut session = QuizSession::generate(&set, QuizSize::count(3).unwrap(), &mut rng).unwrap();
        while !session.is_complete() {
            session.submit_option(0).unwrap();
            session.advance().unwrap();
        }

        let retaken = session.retake(&mut rng).unwrap();
        assert_eq!(retaken.total(), 3);
        assert_eq!(retaken.requested_size(), QuizSize::count(3).unwrap());
        assert_eq!(retaken.score(), 0);
        assert_eq!(retaken.current_index(), 0);
        assert!(!retaken.is_complete());
        assert!(retaken.questions().iter().all(|q| !q.is_answered()));

        // a retake is regenerated, not a replay of the same layout
        let layout = |s: &QuizSession| -> Vec<(String, Vec<String>)> {
            s.questions()
                .iter()
                .map(|q| (q.prompt().to_owned(), q.options().to_vec()))
                .collect()
        };
        let original = layout(&session);
        assert!(
            (0..8u64)
                .map(|seed| session.retake(&mut StdRng::seed_from_u64(seed)).unwrap())
                .any(|again| layout(&again) != original)
        );
    }

    #[test]
    fn same_seed_same_quiz() {
        let set = build_set(10);
        let a = QuizSession::generate(&set, QuizSize::count(5).unwrap(), &mut StdRng::seed_from_u64(8))
            .unwrap();
        let b = QuizSession::generate(&set, QuizSize::count(5).unwrap(), &mut StdRng::seed_from_u64(8))
            .unwrap();
        assert_eq!(a.questions(), b.questions());
    }

    #[test]
    fn progress_tracks_position_and_score() {
        let set = build_set(4);
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = QuizSession::generate(&set, QuizSize::All, &mut rng).unwrap();
        let answer = session.current_question().unwrap().correct_answer().to_owned();
        session.submit_answer(answer).unwrap();

        let progress = session.progress();
        assert_eq!(progress.position, 1);
        assert_eq!(progress.total, 4);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.score, 1);
        assert_eq!(progress.score_percentage, 25);
        assert_eq!(progress.progress_percentage, 25);

        session.advance().unwrap();
        while !session.is_complete() {
            session.submit_answer("wrong").unwrap();
            session.advance().unwrap();
        }
        // stays on the last question, capped at total
        let done = session.progress();
        assert_eq!(done.position, done.total);
        assert_eq!(done.progress_percentage, 100);
    }
}
