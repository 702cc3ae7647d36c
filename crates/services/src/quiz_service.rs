use std::sync::Arc;

use flashcards_core::model::{FlashcardSet, SetId};
use flashcards_core::quiz::{QuizSession, QuizSize, QuizSummary};
use storage::repository::{SetRepository, StorageError};

use crate::Clock;
use crate::error::QuizServiceError;
use crate::rng::SharedRng;

/// Loads sets for quizzing and records completed attempts.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    sets: Arc<dyn SetRepository>,
    rng: SharedRng,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, sets: Arc<dyn SetRepository>) -> Self {
        Self {
            clock,
            sets,
            rng: SharedRng::from_os(),
        }
    }

    /// Replace the random source with one seeded from `seed`, making
    /// question order and option layout reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SharedRng::seeded(seed);
        self
    }

    /// Generate a new quiz over the stored set.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::SetNotFound` if the set does not exist.
    /// Returns `QuizServiceError::Quiz` if the set is too small to quiz.
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn start_quiz(
        &self,
        set_id: &SetId,
        size: QuizSize,
    ) -> Result<QuizSession, QuizServiceError> {
        let set = self.load(set_id).await?;
        let session = self
            .rng
            .with(|rng| QuizSession::generate(&set, size, rng))?;
        log::info!(
            "started quiz on set {} with {} of {} cards",
            set_id,
            session.total(),
            set.card_count()
        );
        Ok(session)
    }

    /// Summarise a completed quiz and stamp the set as studied now.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if the session is not completed.
    /// Returns `QuizServiceError::SetNotFound` if the set was removed
    /// meanwhile.
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn complete_quiz(
        &self,
        session: &QuizSession,
    ) -> Result<QuizSummary, QuizServiceError> {
        let summary = session.summarize()?;
        let set_id = session.set_id();
        self.sets
            .mark_studied(set_id, self.clock.now())
            .await
            .map_err(|e| match e {
                StorageError::NotFound => QuizServiceError::SetNotFound(set_id.clone()),
                other => QuizServiceError::Storage(other),
            })?;
        log::info!(
            "completed quiz on set {}: {}/{} ({}%)",
            set_id,
            summary.score,
            summary.total,
            summary.percentage
        );
        Ok(summary)
    }

    /// Start a fresh attempt over the same set snapshot and size.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if generation fails.
    pub fn retake(&self, session: &QuizSession) -> Result<QuizSession, QuizServiceError> {
        let next = self.rng.with(|rng| session.retake(rng))?;
        log::debug!("retaking quiz on set {}", session.set_id());
        Ok(next)
    }

    async fn load(&self, set_id: &SetId) -> Result<FlashcardSet, QuizServiceError> {
        self.sets
            .get_set(set_id)
            .await?
            .ok_or_else(|| QuizServiceError::SetNotFound(set_id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flashcards_core::model::{Card, CardId, SectionId};
    use flashcards_core::quiz::QuizError;
    use flashcards_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn build_set(id: &str, cards: usize) -> FlashcardSet {
        let cards = (0..cards).map(|i| {
            Card::new(
                CardId::new(format!("{id}-{i}")).unwrap(),
                format!("Term {i}"),
                format!("Definition {i}"),
            )
            .unwrap()
        });
        FlashcardSet::new(
            SetId::new(id).unwrap(),
            "Quiz me",
            None,
            SectionId::uncategorized(),
            fixed_now(),
        )
        .unwrap()
        .with_cards(cards)
        .unwrap()
    }

    async fn service_with(set: &FlashcardSet) -> QuizService {
        let repo = Arc::new(InMemoryRepository::new());
        repo.upsert_set(set).await.unwrap();
        QuizService::new(Clock::fixed(fixed_now()), repo).with_seed(7)
    }

    #[tokio::test]
    async fn missing_set_is_reported() {
        let service = service_with(&build_set("a", 4)).await;
        let err = service
            .start_quiz(&SetId::new("b").unwrap(), QuizSize::All)
            .await
            .unwrap_err();
        assert!(matches!(err, QuizServiceError::SetNotFound(id) if id.as_str() == "b"));
    }

    #[tokio::test]
    async fn small_set_is_rejected() {
        let set = build_set("a", 3);
        let service = service_with(&set).await;
        let err = service.start_quiz(set.id(), QuizSize::All).await.unwrap_err();
        assert!(matches!(
            err,
            QuizServiceError::Quiz(QuizError::InsufficientCards {
                required: 4,
                available: 3
            })
        ));
    }

    #[tokio::test]
    async fn same_seed_generates_same_quiz() {
        let set = build_set("a", 8);
        let first = service_with(&set).await;
        let second = service_with(&set).await;
        let size = QuizSize::count(5).unwrap();

        let a = first.start_quiz(set.id(), size).await.unwrap();
        let b = second.start_quiz(set.id(), size).await.unwrap();
        let prompts = |s: &QuizSession| -> Vec<(String, Vec<String>)> {
            s.questions()
                .iter()
                .map(|q| (q.prompt().to_owned(), q.options().to_vec()))
                .collect()
        };
        assert_eq!(prompts(&a), prompts(&b));
    }

    #[tokio::test]
    async fn incomplete_quiz_is_not_recorded() {
        let set = build_set("a", 4);
        let service = service_with(&set).await;
        let session = service.start_quiz(set.id(), QuizSize::All).await.unwrap();

        let err = service.complete_quiz(&session).await.unwrap_err();
        assert!(matches!(err, QuizServiceError::Quiz(QuizError::InvalidState(_))));
        let stored = service.sets.get_set(set.id()).await.unwrap().unwrap();
        assert!(stored.last_studied().is_none());
    }

    #[tokio::test]
    async fn retake_keeps_size() {
        let set = build_set("a", 10);
        let service = service_with(&set).await;
        let session = service
            .start_quiz(set.id(), QuizSize::count(5).unwrap())
            .await
            .unwrap();
        let again = service.retake(&session).unwrap();
        assert_eq!(again.total(), 5);
        assert_eq!(again.score(), 0);
        assert_eq!(again.requested_size(), session.requested_size());
    }
}
